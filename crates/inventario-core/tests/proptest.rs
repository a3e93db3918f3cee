use inventario_core::barcode::{BarcodeGenerator, BarcodeLayout, BARCODE_ALPHABET, MAX_ATTEMPTS};
use inventario_core::cost::{CostCodec, SubstitutionTable};
use proptest::prelude::*;

fn arb_table() -> impl Strategy<Value = SubstitutionTable> {
    prop_oneof![
        Just(SubstitutionTable::HUB),
        Just(SubstitutionTable::CLASSIC),
    ]
}

fn arb_layout() -> impl Strategy<Value = BarcodeLayout> {
    prop_oneof![Just(BarcodeLayout::A), Just(BarcodeLayout::B)]
}

fn hub_word() -> impl Strategy<Value = String> {
    "[HUBLOTERAShublotearas]{0,12}"
}

proptest! {
    #[test]
    fn decode_is_repeatable(table in arb_table(), input in "\\PC{0,30}") {
        let codec = CostCodec::new(table);
        prop_assert_eq!(codec.decode(&input), codec.decode(&input));
    }

    #[test]
    fn decode_ignores_foreign_characters(word in hub_word(), noise in "[0-9 \\-_.]{0,5}") {
        let codec = CostCodec::new(SubstitutionTable::HUB);
        let mut noisy = String::new();
        for c in word.chars() {
            noisy.push(c);
            noisy.push_str(&noise);
        }
        prop_assert_eq!(codec.decode(&noisy), codec.decode(&word));
    }

    #[test]
    fn decode_matches_digit_concatenation(word in hub_word()) {
        let codec = CostCodec::new(SubstitutionTable::HUB);
        let digits: String = word
            .to_uppercase()
            .chars()
            .filter_map(|c| SubstitutionTable::HUB.digit_for(c))
            .collect();
        let expected: u64 = digits.parse().unwrap_or(0);
        prop_assert_eq!(codec.decode(&word), expected);
    }

    #[test]
    fn valid_encodings_are_table_words(table in arb_table(), input in "\\PC{0,20}") {
        let codec = CostCodec::new(table);
        let normalized = input.trim().to_uppercase();
        let expected = !normalized.is_empty() && normalized.chars().all(|c| table.contains(c));
        prop_assert_eq!(codec.is_valid_encoding(&input), expected);
    }

    #[test]
    fn candidates_keep_layout_shape(
        layout in arb_layout(),
        code in "[0-9A-Za-z\\-]{0,15}",
        cost in "[A-Za-z]{0,8}",
    ) {
        let generator = BarcodeGenerator::new(layout);
        let barcode = generator.render_candidate(&code, &cost);

        prop_assert!(barcode[..layout.prefix_len()].bytes().all(|b| BARCODE_ALPHABET.contains(&b)));
        if let Some(len) = layout.fixed_len() {
            prop_assert_eq!(barcode.len(), len);
        }
        prop_assert!(layout.matches_shape(&barcode));
    }

    #[test]
    fn exhausted_generation_ends_in_digits(layout in arb_layout(), code in "[0-9]{0,8}") {
        let generator = BarcodeGenerator::new(layout);
        let mut calls = 0;
        let barcode = generator.generate_unique(&code, "HUB", |_| {
            calls += 1;
            true
        });

        prop_assert_eq!(calls, MAX_ATTEMPTS);
        prop_assert!(!barcode.is_empty());
        prop_assert!(barcode[barcode.len() - 3..].bytes().all(|b| b.is_ascii_digit()));
    }
}

#[test]
fn end_to_end_hub_table_layout_b() {
    let codec = CostCodec::new(SubstitutionTable::HUB);
    let generator = BarcodeGenerator::new(BarcodeLayout::B);

    assert_eq!(codec.decode("HUB"), 12);

    let barcode = generator.generate_unique("103", "hub", |_| false);
    assert_eq!(barcode.len(), 10);
    assert!(barcode.ends_with("103"));
}
