//! Deterministic product color generation.
//!
//! Every tool that renders packing results derives a product's color
//! independently from its `ProductId`, with no shared state: the batch
//! colorizer in this workspace and the browser visualizer must agree on
//! every byte of the color they compute. The mapping is a 31x+c string
//! hash on a wrapping 32-bit signed accumulator, an HSL triple carved out
//! of different windows of the hash, and an HSL to RGB conversion whose
//! channels truncate toward zero. The overflow behavior and the truncation
//! are part of the contract; changing either silently breaks cross-tool
//! color agreement.

/// Hashes an identifier into a signed 32-bit accumulator.
///
/// Per character `c` (a Unicode scalar value) the accumulator advances as
/// `h = c + ((h << 5) - h)`, i.e. `h * 31 + c`, with every operation
/// wrapping at 32-bit two's-complement.
fn str_to_hash(s: &str) -> i32 {
    let mut hash: i32 = 0;
    for c in s.chars() {
        let code = u32::from(c) as i32;
        hash = code.wrapping_add((hash << 5).wrapping_sub(hash));
    }
    hash
}

/// Derives hue and saturation/lightness percentages from a hash.
///
/// Hue is in [0, 359], saturation in [65, 84] and lightness in [55, 69],
/// which keeps the palette vivid and bright enough for box edges to stay
/// readable. The shifts are arithmetic shifts on the signed hash; the
/// absolute value is taken after shifting.
fn hash_to_hsl(hash: i32) -> (u32, u32, u32) {
    let hue = (hash % 360).unsigned_abs();
    let sat = 65 + (hash >> 8).unsigned_abs() % 20;
    let light = 55 + (hash >> 16).unsigned_abs() % 15;
    (hue, sat, light)
}

/// Converts an HSL triple (degrees, percent, percent) to RGB channels.
///
/// Standard sextant conversion. The final channels truncate toward zero
/// rather than rounding to nearest; the other consumers of this mapping
/// truncate, so rounding here would shift channels by one.
fn hsl_to_rgb(hue: u32, sat: u32, light: u32) -> (u8, u8, u8) {
    let h = f64::from(hue);
    let s = f64::from(sat) / 100.0;
    let l = f64::from(light) / 100.0;

    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
    let m = l - c / 2.0;

    let (r, g, b) = match hue {
        0..=59 => (c, x, 0.0),
        60..=119 => (x, c, 0.0),
        120..=179 => (0.0, c, x),
        180..=239 => (0.0, x, c),
        240..=299 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    (
        ((r + m) * 255.0) as u8,
        ((g + m) * 255.0) as u8,
        ((b + m) * 255.0) as u8,
    )
}

/// Returns the display color for a product identifier.
///
/// The color is formatted as `#RRGGBB` with uppercase, zero-padded hex
/// digits. The same identifier always yields the same string, in any
/// process and any run; identifiers are compared exactly, so identifiers
/// differing only in case get distinct colors. Total for every string
/// input, including the empty identifier, which hashes to 0.
pub fn product_color(identifier: &str) -> String {
    let (hue, sat, light) = hash_to_hsl(str_to_hash(identifier));
    let (r, g, b) = hsl_to_rgb(hue, sat, light);
    format!("#{r:02X}{g:02X}{b:02X}")
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_str_to_hash() {
        assert_eq!(str_to_hash(""), 0);
        assert_eq!(str_to_hash("1"), 49);
        assert_eq!(str_to_hash("10"), 1567);
        assert_eq!(str_to_hash("box"), 97739);
        assert_eq!(str_to_hash("crate-7"), 1025410221);
        // The accumulator wraps at 32 bits and may go negative.
        assert_eq!(str_to_hash("PROD-001"), -222345541);
        assert_eq!(str_to_hash("item_0001"), -2143240787);
        assert_eq!(
            str_to_hash("a-very-long-product-identifier-used-for-overflow-checks"),
            -140080702
        );
    }

    #[test]
    fn test_hash_to_hsl() {
        assert_eq!(hash_to_hsl(0), (0, 65, 55));
        // "1" hashes to 49; all three components come from windows that
        // are zero for such a small hash.
        assert_eq!(hash_to_hsl(49), (49, 65, 55));
        assert_eq!(hash_to_hsl(1567), (127, 71, 55));
        // Negative hashes: truncated remainder and arithmetic shifts, the
        // absolute value applied afterwards.
        assert_eq!(hash_to_hsl(-222345541), (181, 83, 58));
        assert_eq!(hash_to_hsl(-2143240787), (227, 80, 59));
    }

    #[test]
    fn test_truncating_channel_conversion() {
        // HSL(49, 65%, 55%) has fractional channels 214.8/187.5/65.6; the
        // conversion truncates instead of rounding to nearest.
        assert_eq!(hsl_to_rgb(49, 65, 55), (214, 187, 65));
        assert_eq!(hsl_to_rgb(0, 65, 55), (214, 65, 65));
        assert_eq!(hsl_to_rgb(181, 83, 58), (59, 233, 236));
    }

    #[test]
    fn test_product_color() {
        // Pinned reference vectors; every independent implementation of
        // this mapping must agree on each of these bytes.
        assert_eq!(product_color("1"), "#D6BB41");
        assert_eq!(product_color("2"), "#D6BD41");
        assert_eq!(product_color("3"), "#D6C041");
        assert_eq!(product_color("10"), "#3ADD4D");
        assert_eq!(product_color("42"), "#3A6BDD");
        assert_eq!(product_color("PROD-001"), "#3BE9EC");
        assert_eq!(product_color("SKU-12345"), "#4CEF54");
        assert_eq!(product_color("crate-7"), "#763CE0");
        assert_eq!(product_color("pallet-blue-large"), "#E05B73");
        // The empty identifier is valid.
        assert_eq!(product_color(""), "#D64141");
        // Non-ASCII identifiers hash by Unicode scalar value.
        assert_eq!(product_color("\u{1F600}"), "#D94357");
    }

    #[test]
    fn test_identifiers_are_case_sensitive() {
        assert_eq!(product_color("Widget"), "#645AEB");
        assert_eq!(product_color("widget"), "#A1E862");
    }

    proptest! {
        #[test]
        fn test_color_is_deterministic_and_well_formed(s: String) {
            let color = product_color(&s);
            prop_assert_eq!(&color, &product_color(&s));
            prop_assert_eq!(color.len(), 7);
            prop_assert!(color.starts_with('#'));
            prop_assert!(color
                .chars()
                .skip(1)
                .all(|c| c.is_ascii_digit() || ('A'..='F').contains(&c)));
        }

        #[test]
        fn test_hsl_stays_in_range(s: String) {
            let (hue, sat, light) = hash_to_hsl(str_to_hash(&s));
            prop_assert!(hue <= 359);
            prop_assert!((65..=84).contains(&sat));
            prop_assert!((55..=69).contains(&light));
        }
    }
}
