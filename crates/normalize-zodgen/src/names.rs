//! Identifier conventions for generated schemas.

/// Binding name of the schema library when no override is given.
pub const DEFAULT_SCHEMA_ALIAS: &str = "z";

/// Suffix appended to every generated schema identifier.
pub const SCHEMA_SUFFIX: &str = "Schema";

/// Identifier of the schema generated for `declared_name`.
///
/// `SecretIdentity` → `secretIdentitySchema`, `IDidFindYou` → `iDidFindYouSchema`.
pub fn schema_name(declared_name: &str) -> String {
    let mut name = camel_case(declared_name);
    name.push_str(SCHEMA_SUFFIX);
    name
}

/// Namespace prefix for base constructor calls.
pub fn schema_library_alias(alias: Option<&str>) -> &str {
    alias.unwrap_or(DEFAULT_SCHEMA_ALIAS)
}

/// Lower camel case, splitting words on separators, lower→upper transitions
/// and the end of an acronym (`HTMLParser` → `html`, `Parser`).
pub fn camel_case(input: &str) -> String {
    let words = split_words(input);
    let mut out = String::with_capacity(input.len());
    for (i, word) in words.iter().enumerate() {
        let lower = word.to_lowercase();
        if i == 0 {
            out.push_str(&lower);
            continue;
        }
        let mut chars = lower.chars();
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            out.push_str(chars.as_str());
        }
    }
    out
}

fn split_words(input: &str) -> Vec<String> {
    let chars: Vec<char> = input.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if !c.is_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }
        if c.is_uppercase() && !current.is_empty() {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            if prev.is_lowercase() || prev.is_ascii_digit() || (prev.is_uppercase() && next_is_lower)
            {
                words.push(std::mem::take(&mut current));
            }
        }
        current.push(c);
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_names() {
        assert_eq!(schema_name("MyHeroName"), "myHeroNameSchema");
        assert_eq!(schema_name("loisLaneCapturedCount"), "loisLaneCapturedCountSchema");
        assert_eq!(schema_name("IDidFindYou"), "iDidFindYouSchema");
        assert_eq!(schema_name("Superman"), "supermanSchema");
    }

    #[test]
    fn acronyms_and_separators() {
        assert_eq!(camel_case("HTMLParser"), "htmlParser");
        assert_eq!(camel_case("UserID"), "userId");
        assert_eq!(camel_case("user_id"), "userId");
        assert_eq!(camel_case("kebab-case-name"), "kebabCaseName");
        assert_eq!(camel_case("Vector3D"), "vector3D");
        assert_eq!(camel_case("Api.Response"), "apiResponse");
    }

    #[test]
    fn resolution_is_stable() {
        assert_eq!(schema_name("SecretIdentity"), schema_name("SecretIdentity"));
    }

    #[test]
    fn alias_override() {
        assert_eq!(schema_library_alias(None), "z");
        assert_eq!(schema_library_alias(Some("zod")), "zod");
    }
}
