//! Identifier transformation utilities for code generation

/// Converts a string to snake_case.
///
/// Handles camelCase, PascalCase, kebab-case and space separated input.
/// Runs of capitals are kept together (`HTTPResponse` becomes
/// `httpresponse`); any other punctuation is dropped.
///
/// # Examples
/// ```
/// use swaggen::generation::utils::to_snake_case;
///
/// assert_eq!(to_snake_case("findPetsByStatus"), "find_pets_by_status");
/// assert_eq!(to_snake_case("X-Request-Id"), "x_request_id");
/// ```
pub fn to_snake_case(s: &str) -> String {
    let mut result = String::new();
    let mut prev_is_lowercase = false;

    for ch in s.chars() {
        if ch.is_uppercase() {
            if prev_is_lowercase {
                result.push('_');
            }
            result.extend(ch.to_lowercase());
            prev_is_lowercase = false;
        } else if ch.is_alphanumeric() {
            result.push(ch);
            prev_is_lowercase = ch.is_lowercase() || ch.is_ascii_digit();
        } else if matches!(ch, '-' | '_' | ' ' | '.' | '/') {
            if !result.is_empty() && !result.ends_with('_') {
                result.push('_');
            }
            prev_is_lowercase = false;
        }
    }

    result.trim_matches('_').to_string()
}

/// Converts a string to UpperCamelCase for type and variant names.
///
/// ```
/// use swaggen::generation::utils::to_proper_case;
///
/// assert_eq!(to_proper_case("get_item"), "GetItem");
/// assert_eq!(to_proper_case("Not Found"), "NotFound");
/// ```
pub fn to_proper_case(s: &str) -> String {
    to_snake_case(s)
        .split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                None => String::new(),
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
            }
        })
        .collect()
}

/// Converts a string to lowerCamelCase.
pub fn to_camel_case(s: &str) -> String {
    let pascal = to_proper_case(s);
    let mut chars = pascal.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_lowercase().collect::<String>() + chars.as_str(),
    }
}

/// Sanitizes a string into a valid Rust field or function name.
///
/// Reserved words get a trailing underscore and a leading digit gets a
/// `p_` prefix.
///
/// ```
/// use swaggen::generation::utils::sanitize_rust_field_name;
///
/// assert_eq!(sanitize_rust_field_name("type"), "type_");
/// assert_eq!(sanitize_rust_field_name("firstName"), "first_name");
/// ```
pub fn sanitize_rust_field_name(s: &str) -> String {
    let snake_case = to_snake_case(s);
    if snake_case.is_empty() {
        return "param".to_string();
    }
    if snake_case.starts_with(|c: char| c.is_ascii_digit()) {
        return format!("p_{snake_case}");
    }

    match snake_case.as_str() {
        "as" | "break" | "const" | "continue" | "crate" | "else" | "enum" | "extern" | "false"
        | "fn" | "for" | "if" | "impl" | "in" | "let" | "loop" | "match" | "mod" | "move"
        | "mut" | "pub" | "ref" | "return" | "self" | "static" | "struct" | "super" | "trait"
        | "true" | "type" | "unsafe" | "use" | "where" | "while" | "async" | "await" | "dyn"
        | "abstract" | "become" | "box" | "do" | "final" | "macro" | "override" | "priv"
        | "typeof" | "unsized" | "virtual" | "yield" | "try" | "gen" => format!("{snake_case}_"),
        _ => snake_case,
    }
}

/// Variant name for a response status: the reason phrase in UpperCamelCase,
/// or `Status<code>` when the code has none.
///
/// ```
/// use swaggen::generation::utils::status_variant_name;
///
/// assert_eq!(status_variant_name(200), "Ok");
/// assert_eq!(status_variant_name(404), "NotFound");
/// assert_eq!(status_variant_name(299), "Status299");
/// ```
pub fn status_variant_name(code: u16) -> String {
    let phrase = reqwest::StatusCode::from_u16(code)
        .ok()
        .and_then(|status| status.canonical_reason())
        .map(to_proper_case)
        .unwrap_or_default();

    if phrase.is_empty() || !phrase.starts_with(|c: char| c.is_ascii_uppercase()) {
        format!("Status{code}")
    } else {
        phrase
    }
}

/// True for names cargo accepts as a package name
pub fn is_valid_package_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_snake_case() {
        assert_eq!(to_snake_case("findPetsByStatus"), "find_pets_by_status");
        assert_eq!(to_snake_case("FindPetsByStatus"), "find_pets_by_status");
        assert_eq!(to_snake_case("find-pets-by-status"), "find_pets_by_status");
        assert_eq!(to_snake_case("HTTPResponse"), "httpresponse");
        assert_eq!(to_snake_case("get HTTP Response"), "get_http_response");
        assert_eq!(to_snake_case("get /items/{id}"), "get_items_id");
        assert_eq!(to_snake_case("v2Items"), "v2_items");
    }

    #[test]
    fn test_to_proper_case() {
        assert_eq!(to_proper_case("find_pets_by_status"), "FindPetsByStatus");
        assert_eq!(to_proper_case("findPetsByStatus"), "FindPetsByStatus");
        assert_eq!(to_proper_case("FIND_PETS_BY_STATUS"), "FindPetsByStatus");
        assert_eq!(to_proper_case("No Content"), "NoContent");
    }

    #[test]
    fn test_to_camel_case() {
        assert_eq!(to_camel_case("get_items_by_id"), "getItemsById");
        assert_eq!(to_camel_case("FindPetsByStatus"), "findPetsByStatus");
        assert_eq!(to_camel_case(""), "");
    }

    #[test]
    fn test_sanitize_rust_field_name() {
        assert_eq!(sanitize_rust_field_name("type"), "type_");
        assert_eq!(sanitize_rust_field_name("self"), "self_");
        assert_eq!(sanitize_rust_field_name("X-Tenant-Id"), "x_tenant_id");
        assert_eq!(sanitize_rust_field_name("2fa"), "p_2fa");
        assert_eq!(sanitize_rust_field_name("$$"), "param");
    }

    #[test]
    fn test_status_variant_name() {
        assert_eq!(status_variant_name(201), "Created");
        assert_eq!(status_variant_name(204), "NoContent");
        assert_eq!(status_variant_name(429), "TooManyRequests");
        assert_eq!(status_variant_name(599), "Status599");
    }

    #[test]
    fn test_is_valid_package_name() {
        assert!(is_valid_package_name("petstore-client"));
        assert!(is_valid_package_name("pet_store2"));
        assert!(!is_valid_package_name("2pets"));
        assert!(!is_valid_package_name("pet store"));
        assert!(!is_valid_package_name(""));
    }
}
