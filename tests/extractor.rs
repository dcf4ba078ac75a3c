use shelfscan::domain::product::{extract_products, ProductRecord};

const URL: &str = "https://blinkit.com/cn/baking-ingredients/cid/888/971";

#[test]
fn extract_products_from_rendered_cards() {
    // Card texts as returned by the browser, including an outer wrapper div
    let cards = [
        "Baking Ingredients\nSort by\nBaking Soda\n100 g\n₹30\nADD\nCocoa Powder\n₹210\nADD",
        "8 mins\nBaking Soda\n100 g\n₹30\n₹35\nADD",
        "Weikfield Cocoa Powder\n50 g\n₹1,210.50\nADD",
        "Mystery Item\nADD",
        "\n₹99\nADD",
    ];
    let cards: Vec<String> = cards.iter().map(|c| c.to_string()).collect();

    let results = extract_products(&cards, URL);

    assert_eq!(
        results,
        vec![
            ProductRecord {
                name: "Baking Ingredients".to_string(),
                quantity: Some("100 g".to_string()),
                price: 30.0,
                source_url: URL.to_string(),
            },
            ProductRecord {
                name: "8 mins".to_string(),
                quantity: Some("100 g".to_string()),
                price: 30.0,
                source_url: URL.to_string(),
            },
            ProductRecord {
                name: "Weikfield Cocoa Powder".to_string(),
                quantity: Some("50 g".to_string()),
                price: 1210.5,
                source_url: URL.to_string(),
            },
        ]
    );
}

#[test]
fn extract_products_without_cards_is_empty() {
    assert!(extract_products(&[], URL).is_empty());
}
