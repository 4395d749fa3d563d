//! Page category constants.
//!
//! Every screen declares an HTML `id` in the format `{entity}--{category}`
//! (e.g. `"a001_assembly_order--list"`) and `data-page-category` with one of
//! the constants below.

/// List of records: table with filters/pagination.
pub const PAGE_CAT_LIST: &str = "list";

/// Detail / processing form for a single record.
pub const PAGE_CAT_DETAIL: &str = "detail";

/// System administration page.
pub const PAGE_CAT_SYSTEM: &str = "system";

/// Validate that a page id matches the `{entity}--{category}` format.
pub fn is_valid_page_id(id: &str) -> bool {
    let parts: Vec<&str> = id.splitn(2, "--").collect();
    parts.len() == 2 && !parts[0].is_empty() && !parts[1].is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_ids() {
        assert!(is_valid_page_id("sys_users--list"));
        assert!(is_valid_page_id("a001_assembly_order--detail"));
        assert!(!is_valid_page_id("sys_users"));
        assert!(!is_valid_page_id("--list"));
    }
}
