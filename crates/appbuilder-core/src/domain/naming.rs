//! Naming conventions used to derive artifact ids, package names and
//! display names from user-supplied application and service names.

/// `OrderProcessor` / `order processor` / `order_processor` → `order-processor`.
pub fn to_kebab_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    let mut prev: Option<char> = None;
    let mut in_separator = false;

    for c in name.chars() {
        if c.is_whitespace() || c == '_' {
            if !in_separator {
                out.push('-');
                in_separator = true;
            }
            prev = Some(c);
            continue;
        }
        in_separator = false;

        if c.is_ascii_uppercase() && prev.is_some_and(|p| p.is_ascii_lowercase()) {
            out.push('-');
        }
        out.extend(c.to_lowercase());
        prev = Some(c);
    }

    out
}

/// `order-processor` → `order/processor`.
pub fn to_slash_case(kebab_case: &str) -> String {
    kebab_case.replace('-', "/")
}

/// `order-processor` → `order.processor`.
pub fn to_package_path(kebab_case: &str) -> String {
    kebab_case.replace('-', ".")
}

/// `com.acme.orders` → `com/acme/orders`.
pub fn package_to_dir(package_name: &str) -> String {
    package_name.replace('.', "/")
}

/// `order-processor` / `order processor` → `OrderProcessor`.
pub fn to_pascal_case(input: &str) -> String {
    input
        .split(|c: char| c == '-' || c == '_' || c.is_whitespace())
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}

/// `order   PROCESSOR` → `Order Processor`.
pub fn for_display(name: &str) -> String {
    name.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// `Order Book` → `orderbook`.
pub fn to_app_token_name(app_name: &str) -> String {
    app_name
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}
