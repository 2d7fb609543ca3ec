//! 元素リストの分割

/// カンマ・空白区切りの元素記号を分割する
///
/// 各トークンはトリムされ、空トークンは捨てられる。順序は保持する。
///
/// # Examples
/// ```
/// use dara_local_common::split_elements;
///
/// assert_eq!(split_elements("Y, Mo , O"), vec!["Y", "Mo", "O"]);
/// assert!(split_elements("").is_empty());
/// ```
pub fn split_elements(value: &str) -> Vec<String> {
    value
        .split(|c: char| c == ',' || c.is_whitespace())
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

/// 化学系（"Y-Mo-O"）を元素記号に分割する
pub fn chemical_system_elements(value: &str) -> Vec<String> {
    value
        .split('-')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

/// 元素リストをバックエンドが期待するJSON配列文字列にする
pub fn to_json_array(elements: &[String]) -> String {
    serde_json::to_string(elements).unwrap_or_else(|_| "[]".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_comma_and_spaces() {
        assert_eq!(split_elements("Y, Mo , O"), vec!["Y", "Mo", "O"]);
    }

    #[test]
    fn test_split_empty() {
        assert!(split_elements("").is_empty());
        assert!(split_elements("  , ,\t").is_empty());
    }

    #[test]
    fn test_split_whitespace_only_separators() {
        assert_eq!(split_elements("Pb  Cd\nNa"), vec!["Pb", "Cd", "Na"]);
    }

    #[test]
    fn test_split_keeps_order_and_duplicates() {
        assert_eq!(split_elements("O,Y,,O"), vec!["O", "Y", "O"]);
    }

    #[test]
    fn test_chemical_system() {
        assert_eq!(chemical_system_elements("Y-Mo-O"), vec!["Y", "Mo", "O"]);
        assert!(chemical_system_elements("").is_empty());
    }

    #[test]
    fn test_json_array() {
        let elements = split_elements("Y Mo");
        assert_eq!(to_json_array(&elements), r#"["Y","Mo"]"#);
        assert_eq!(to_json_array(&[]), "[]");
    }
}
