//! Navigation menu shaping.

use plantwatch_api_models::{MenuItem, SubMenuItem};

/// Prefix each sub-item uri with the slug of its parent label.
#[must_use]
pub fn transform_menu_items(items: &[MenuItem]) -> Vec<MenuItem> {
    items
        .iter()
        .map(|item| {
            let parent = slugify(&item.label);
            MenuItem {
                menus: item.menus.as_ref().map(|menus| {
                    menus
                        .iter()
                        .map(|sub| SubMenuItem {
                            uri: format!("{parent}/{}", sub.uri),
                            ..sub.clone()
                        })
                        .collect()
                }),
                ..item.clone()
            }
        })
        .collect()
}

/// Every sub-item across the menu, in order.
#[must_use]
pub fn extract_sub_menus(items: &[MenuItem]) -> Vec<SubMenuItem> {
    items
        .iter()
        .flat_map(|item| item.menus.iter().flatten().cloned())
        .collect()
}

/// Lower-case `label` and replace each whitespace run with one hyphen.
#[must_use]
pub fn slugify(label: &str) -> String {
    let mut slug = String::with_capacity(label.len());
    let mut in_space = false;
    for ch in label.chars() {
        if ch.is_whitespace() {
            if !in_space {
                slug.push('-');
            }
            in_space = true;
        } else {
            slug.extend(ch.to_lowercase());
            in_space = false;
        }
    }
    slug
}
