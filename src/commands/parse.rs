use crate::page_range::{parse_page_ranges, validate_page_ranges, ParseResult, Validation};
use anyhow::Result;

pub fn run(ranges: &str, total: Option<u32>, json: bool) -> Result<()> {
    let result = check(ranges, total);

    if json {
        let validation = Validation::from(result.clone());
        println!("{}", serde_json::to_string_pretty(&validation)?);
    }

    let pages = result?;
    if !json {
        match pages.listing() {
            Some(list) => {
                let list: Vec<String> = list.iter().map(|p| p.to_string()).collect();
                println!("Pages: {}", list.join(", "));
            }
            None => println!("Pages: (too many to list)"),
        }
        println!("Ranges: {}", pages);
        println!("Count: {}", pages.len());
    }

    Ok(())
}

fn check(ranges: &str, total: Option<u32>) -> ParseResult {
    match total {
        Some(total) => validate_page_ranges(ranges, total),
        None => parse_page_ranges(ranges),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page_range::RangeError;

    #[test]
    fn test_check_without_total() {
        assert_eq!(check("3,1-2", None).unwrap().to_vec(), vec![1, 2, 3]);
    }

    #[test]
    fn test_check_with_total() {
        assert!(check("1-4", Some(4)).is_ok());
        assert!(matches!(
            check("1-4", Some(3)),
            Err(RangeError::OutOfBounds { total: 3, .. })
        ));
    }

    #[test]
    fn test_huge_range_with_total() {
        assert!(matches!(
            check("1-400000000", Some(5)),
            Err(RangeError::OutOfBounds { total: 5, .. })
        ));
        assert!(run("1-400000000", None, false).is_ok());
    }

    #[test]
    fn test_invalid_ranges_fail_the_command() {
        let err = run("abc", None, false).unwrap_err();
        assert_eq!(err.to_string(), "Invalid page number: abc");
    }
}
