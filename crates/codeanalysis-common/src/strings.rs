//! String comparison and whitespace helpers

const BOM: char = '\u{feff}';

/// Whitespace as task inputs see it: Unicode whitespace plus the BOM
fn is_space(ch: char) -> bool {
    ch.is_whitespace() || ch == BOM
}

/// Returns the longest prefix shared by `a` and `b`.
///
/// The prefix is measured in whole characters, so it is always a valid slice
/// of both inputs. For `"abcd"` and `"abdf"` this is `"ab"`.
pub fn shared_substring<'a>(a: &'a str, b: &str) -> &'a str {
    let end = a
        .char_indices()
        .zip(b.chars())
        .find(|((_, x), y)| x != y)
        .map(|((idx, _), _)| idx)
        .unwrap_or_else(|| a.len().min(b.len()));
    a.get(..end).unwrap_or_default()
}

/// Returns a new list sorted in ascending lexicographic order.
///
/// The sort is stable, so equal entries keep their relative order.
pub fn sort_strings<S: AsRef<str>>(list: impl IntoIterator<Item = S>) -> Vec<S> {
    let mut sorted: Vec<S> = list.into_iter().collect();
    sorted.sort_by(|a, b| a.as_ref().cmp(b.as_ref()));
    sorted
}

/// Returns true if the input is absent or contains only whitespace
pub fn is_null_or_whitespace(input: Option<&str>) -> bool {
    input.map_or(true, |s| s.chars().all(is_space))
}

/// Returns the trimmed input, or an empty string if it is absent
pub fn trim_to_empty(input: Option<&str>) -> &str {
    input.map_or("", |s| s.trim_matches(is_space))
}

/// Removes a single leading byte-order mark
pub fn strip_bom(input: &str) -> &str {
    input.strip_prefix(BOM).unwrap_or(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shared_substring() {
        assert_eq!(shared_substring("abcd", "abdf"), "ab");
        assert_eq!(shared_substring("abc", "xyz"), "");
        assert_eq!(shared_substring("same", "same"), "same");
        assert_eq!(shared_substring("src/lib", "src"), "src");
    }

    #[test]
    fn test_shared_substring_empty_inputs() {
        assert_eq!(shared_substring("", "abc"), "");
        assert_eq!(shared_substring("abc", ""), "");
        assert_eq!(shared_substring("", ""), "");
    }

    #[test]
    fn test_shared_substring_multibyte() {
        assert_eq!(shared_substring("héllo", "hélp"), "hél");
        assert_eq!(shared_substring("日本語", "日本人"), "日本");
    }

    #[test]
    fn test_sort_strings() {
        assert_eq!(sort_strings(["b", "a", "c"]), vec!["a", "b", "c"]);
        assert_eq!(sort_strings(["a", "b", "c"]), vec!["a", "b", "c"]);
        assert!(sort_strings(Vec::<String>::new()).is_empty());
        assert_eq!(sort_strings(["B", "a", "A"]), vec!["A", "B", "a"]);
    }

    #[test]
    fn test_sort_strings_owned() {
        let files = vec!["z.cs".to_string(), "a.cs".to_string()];
        assert_eq!(sort_strings(files), vec!["a.cs", "z.cs"]);
    }

    #[test]
    fn test_sort_strings_is_stable() {
        #[derive(Debug, PartialEq)]
        struct Tagged(&'static str, u8);
        impl AsRef<str> for Tagged {
            fn as_ref(&self) -> &str {
                self.0
            }
        }

        let sorted = sort_strings([Tagged("b", 1), Tagged("a", 2), Tagged("b", 3), Tagged("a", 4)]);
        assert_eq!(
            sorted,
            vec![Tagged("a", 2), Tagged("a", 4), Tagged("b", 1), Tagged("b", 3)]
        );
    }

    #[test]
    fn test_is_null_or_whitespace() {
        assert!(is_null_or_whitespace(None));
        assert!(is_null_or_whitespace(Some("")));
        assert!(is_null_or_whitespace(Some("   ")));
        assert!(is_null_or_whitespace(Some("\t\r\n\u{feff}")));
        assert!(!is_null_or_whitespace(Some("a")));
        assert!(!is_null_or_whitespace(Some("  a  ")));
    }

    #[test]
    fn test_trim_to_empty() {
        assert_eq!(trim_to_empty(None), "");
        assert_eq!(trim_to_empty(Some("  x  ")), "x");
        assert_eq!(trim_to_empty(Some("\n")), "");
        assert_eq!(trim_to_empty(Some("a b")), "a b");
    }

    #[test]
    fn test_strip_bom() {
        assert_eq!(strip_bom("\u{feff}<a/>"), "<a/>");
        assert_eq!(strip_bom("<a/>"), "<a/>");
        assert_eq!(strip_bom("\u{feff}\u{feff}x"), "\u{feff}x");
    }
}
