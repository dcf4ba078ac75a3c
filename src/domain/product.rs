use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Number followed by a weight or volume unit, e.g. "500g", "1.5 L"
    static ref QUANTITY_REGEX: Regex = Regex::new(r"(?i)(\d+(\.\d+)?)\s*(g|kg|ml|l|gm)").unwrap();

    // Rupee amount, e.g. "₹48.00", "₹ 1,299". ASCII digits only, f64 parsing rejects the rest
    static ref PRICE_REGEX: Regex = Regex::new(r"₹\s*([0-9,]+(\.[0-9]+)?)").unwrap();
}

const RUPEE: char = '₹';

#[derive(Debug, Clone, PartialEq)]
pub struct ProductRecord {
    pub name: String,
    pub quantity: Option<String>,
    pub price: f64,
    pub source_url: String,
}

/// Turns the rendered text of every card on a page into product records.
///
/// Blocks without a name or a parseable price are dropped silently.
pub fn extract_products(blocks: &[String], source_url: &str) -> Vec<ProductRecord> {
    blocks
        .iter()
        .filter_map(|block| extract_product(block, source_url))
        .collect()
}

pub fn extract_product(block: &str, source_url: &str) -> Option<ProductRecord> {
    let lines: Vec<&str> = block.split('\n').collect();

    let name = lines.first().map(|line| line.trim()).unwrap_or_default();
    if name.is_empty() {
        return None;
    }

    let price = extract_price(&lines)?;

    Some(ProductRecord {
        name: name.to_string(),
        quantity: extract_quantity(&lines),
        price,
        source_url: source_url.to_string(),
    })
}

fn extract_quantity(lines: &[&str]) -> Option<String> {
    lines
        .iter()
        .find_map(|line| QUANTITY_REGEX.find(line))
        .map(|m| m.as_str().to_string())
}

fn extract_price(lines: &[&str]) -> Option<f64> {
    // Only the first rupee line with digits counts, even if its amount won't parse
    let amount = lines
        .iter()
        .filter(|line| line.contains(RUPEE))
        .find_map(|line| PRICE_REGEX.captures(line))?;

    amount[1].replace(',', "").parse::<f64>().ok()
}
