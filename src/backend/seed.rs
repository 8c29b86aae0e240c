//! Default watch catalog loaded into a fresh store.

use crate::models::ProductInput;

#[allow(clippy::too_many_arguments)]
fn watch(
    title: &str,
    slug: &str,
    price: f64,
    count_in_stock: u32,
    image: &str,
    brand: &str,
    category: &str,
    description: &str,
) -> ProductInput {
    ProductInput {
        title: Some(title.to_string()),
        slug: Some(slug.to_string()),
        brand: Some(brand.to_string()),
        description: Some(description.to_string()),
        price: Some(price),
        count_in_stock: Some(count_in_stock),
        images: Some(vec![image.to_string()]),
        category: Some(category.to_string()),
        ..Default::default()
    }
}

/// Returns the eight products the storefront ships with.
pub fn default_catalog() -> Vec<ProductInput> {
    vec![
        watch(
            "Casino Royale Watch",
            "casino-royale-watch",
            2900.0,
            10,
            "casino.png",
            "Casino",
            "Men",
            "Classic rubber strap, 40mm case with analog display.",
        ),
        watch(
            "Citizen Quartz Classic",
            "citizen-quartz-classic",
            3350.0,
            5,
            "citizen.png",
            "Citizen",
            "Men",
            "Precision chronograph, stainless steel, water resistant.",
        ),
        watch(
            "Citizen Regal Gold",
            "citizen-regal-gold",
            3350.0,
            4,
            "regal.png",
            "Citizen",
            "Men",
            "Luxury gold-tone watch with automatic movement.",
        ),
        watch(
            "Rolex Quartz Luxury Timepiece",
            "rolex-quartz-luxury-timepiece",
            9800.0,
            6,
            "rolex.png",
            "Rolex",
            "Women",
            "Minimal and elegant design, perfect for daily wear.",
        ),
        watch(
            "Seastar Dynamic Orbit",
            "seastar-dynamic-orbit",
            4000.0,
            8,
            "seastar.png",
            "SeaStar",
            "Women",
            "Rotating Dial",
        ),
        watch(
            "Tissot PRX Black Steel",
            "tissot-prx-black-steel",
            9500.0,
            12,
            "tissot.png",
            "Tissot",
            "Unisex",
            "Textured black dial with sleek silver-tone hands and markers.",
        ),
        watch(
            "Forrad Classic Black",
            "forrad-classic-black",
            2650.0,
            3,
            "forrad.png",
            "Forrad",
            "Men",
            "Comfortable black leather strap with contrast stitching.",
        ),
        watch(
            "Patek Philippe Emerald Horizon",
            "patek-philippe-emerald-horizon",
            8700.0,
            9,
            "patek.png",
            "Patek Philippe",
            "Women",
            "Distinctive green textured dial with luminous hands and hour markers",
        ),
    ]
}
