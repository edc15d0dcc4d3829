//! Filter normalization.
//!
//! Turns untrusted query-string parameters into typed, bounded filter values.
//! Normalization never fails: anything malformed degrades to the default for
//! that field, so a bad `?minPrice=abc` just means "no lower bound".

use std::collections::HashMap;

use crate::models::users::Roles;

/// Highest page number a request may ask for.
pub const MAX_PAGE: u64 = 1_000_000;
/// Upper bound for `limit`, whatever the profile.
pub const MAX_PAGE_SIZE: u64 = 100;
/// Default page size for storefront listings.
pub const STOREFRONT_PAGE_SIZE: u64 = 12;
/// Default page size for admin listings.
pub const ADMIN_PAGE_SIZE: u64 = 20;

const MAX_TEXT_LEN: usize = 100;

/// Which audience a listing is built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileKind {
    Storefront,
    Admin,
}

/// Audience plus the page size used when `limit` is missing or unusable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListingProfile {
    pub kind: ProfileKind,
    default_page_size: u64,
}

impl ListingProfile {
    pub fn storefront() -> Self {
        Self {
            kind: ProfileKind::Storefront,
            default_page_size: STOREFRONT_PAGE_SIZE,
        }
    }

    pub fn admin() -> Self {
        Self {
            kind: ProfileKind::Admin,
            default_page_size: ADMIN_PAGE_SIZE,
        }
    }

    pub fn with_default_page_size(mut self, size: u64) -> Self {
        self.default_page_size = size.clamp(1, MAX_PAGE_SIZE);
        self
    }

    pub fn default_page_size(&self) -> u64 {
        self.default_page_size
    }
}

/// Soft-delete visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activity {
    Active,
    Inactive,
    Any,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Name,
    Price,
    Rating,
    CreatedAt,
}

impl SortKey {
    /// Recognises the public names and the storefront's column-style aliases.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "name" | "nombre" => Some(Self::Name),
            "price" | "precio" => Some(Self::Price),
            "rating" | "calificacion_promedio" => Some(Self::Rating),
            "createdAt" | "created_at" | "fecha_creacion" => Some(Self::CreatedAt),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn parse(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case("desc") {
            Self::Descending
        } else {
            Self::Ascending
        }
    }
}

/// Normalized filter intent for one product listing request.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterSet {
    category_name: Option<String>,
    search_term: Option<String>,
    min_price: Option<f64>,
    max_price: Option<f64>,
    activity: Activity,
    visible_categories_only: bool,
    featured_only: bool,
    sort_key: SortKey,
    sort_direction: SortDirection,
    sort_requested: bool,
    page: u64,
    page_size: u64,
}

impl FilterSet {
    /// Build a filter set from raw query-string pairs.
    pub fn normalize(raw: &HashMap<String, String>, profile: ListingProfile) -> Self {
        let get = |key: &str| raw.get(key).map(String::as_str);

        let (activity, visible_categories_only) = match profile.kind {
            ProfileKind::Storefront => (Activity::Active, true),
            ProfileKind::Admin => (parse_activity(get("activo"), get("status")), false),
        };

        let (default_key, default_direction) = match profile.kind {
            ProfileKind::Storefront => (SortKey::Name, SortDirection::Ascending),
            ProfileKind::Admin => (SortKey::CreatedAt, SortDirection::Descending),
        };

        // An unrecognised sortBy means name ascending on every profile.
        let (sort_key, fallback_direction) = match get("sortBy") {
            Some(raw) => match SortKey::parse(raw) {
                Some(key) => (key, default_direction),
                None => (SortKey::Name, SortDirection::Ascending),
            },
            None => (default_key, default_direction),
        };
        let sort_direction = get("order")
            .map(SortDirection::parse)
            .unwrap_or(fallback_direction);

        Self {
            category_name: get("category").and_then(parse_category),
            search_term: get("search").and_then(parse_search),
            min_price: get("minPrice").and_then(parse_price),
            max_price: get("maxPrice").and_then(parse_price),
            activity,
            visible_categories_only,
            featured_only: parse_flag(get("featured")) == Some(true),
            sort_key,
            sort_direction,
            sort_requested: get("sortBy").is_some(),
            page: parse_page(get("page")),
            page_size: parse_page_size(get("limit"), profile.default_page_size()),
        }
    }

    /// Pin the listing to one category, e.g. from a path segment.
    ///
    /// Returns `None` when the name fails the category character class; such
    /// a category cannot exist, so callers answer "not found".
    pub fn with_category(mut self, name: &str) -> Option<Self> {
        let trimmed = name.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") {
            self.category_name = None;
            return Some(self);
        }
        self.category_name = Some(parse_category(trimmed)?);
        Some(self)
    }

    /// Pin the listing to a search term, e.g. from a path segment.
    ///
    /// Returns `None` for a term that is blank once trimmed.
    pub fn with_search(mut self, term: &str) -> Option<Self> {
        self.search_term = Some(parse_search(term)?);
        Some(self)
    }

    pub fn category_name(&self) -> Option<&str> {
        self.category_name.as_deref()
    }

    pub fn search_term(&self) -> Option<&str> {
        self.search_term.as_deref()
    }

    pub fn min_price(&self) -> Option<f64> {
        self.min_price
    }

    pub fn max_price(&self) -> Option<f64> {
        self.max_price
    }

    pub fn activity(&self) -> Activity {
        self.activity
    }

    pub fn visible_categories_only(&self) -> bool {
        self.visible_categories_only
    }

    pub fn featured_only(&self) -> bool {
        self.featured_only
    }

    pub fn sort_key(&self) -> SortKey {
        self.sort_key
    }

    pub fn sort_direction(&self) -> SortDirection {
        self.sort_direction
    }

    /// Whether the request named a sort key at all, recognised or not.
    pub fn sort_requested(&self) -> bool {
        self.sort_requested
    }

    pub fn page(&self) -> u64 {
        self.page
    }

    pub fn page_size(&self) -> u64 {
        self.page_size
    }
}

/// Normalized filters for the admin user listing.
#[derive(Debug, Clone, PartialEq)]
pub struct UserFilterSet {
    role: Option<Roles>,
    activity: Activity,
    search_term: Option<String>,
    page: u64,
    page_size: u64,
}

impl UserFilterSet {
    pub fn normalize(raw: &HashMap<String, String>, profile: ListingProfile) -> Self {
        let get = |key: &str| raw.get(key).map(String::as_str);

        Self {
            role: get("role")
                .or_else(|| get("tipo_usuario"))
                .and_then(Roles::parse),
            activity: parse_activity(get("activo"), get("status")),
            search_term: get("search").and_then(parse_search),
            page: parse_page(get("page")),
            page_size: parse_page_size(get("limit"), profile.default_page_size()),
        }
    }

    pub fn role(&self) -> Option<&Roles> {
        self.role.as_ref()
    }

    pub fn activity(&self) -> Activity {
        self.activity
    }

    pub fn search_term(&self) -> Option<&str> {
        self.search_term.as_deref()
    }

    pub fn page(&self) -> u64 {
        self.page
    }

    pub fn page_size(&self) -> u64 {
        self.page_size
    }
}

fn parse_page(raw: Option<&str>) -> u64 {
    match raw.and_then(|s| s.trim().parse::<u64>().ok()) {
        None | Some(0) => 1,
        Some(page) => page.min(MAX_PAGE),
    }
}

fn parse_page_size(raw: Option<&str>, default: u64) -> u64 {
    match raw.and_then(|s| s.trim().parse::<i64>().ok()) {
        Some(size) if size > 0 => (size as u64).min(MAX_PAGE_SIZE),
        _ => default.clamp(1, MAX_PAGE_SIZE),
    }
}

fn parse_price(raw: &str) -> Option<f64> {
    let value = raw.trim().parse::<f64>().ok()?;
    (value.is_finite() && value >= 0.0).then_some(value)
}

/// `true`/`false` in the spellings the storefront and admin panel send.
fn parse_flag(raw: Option<&str>) -> Option<bool> {
    match raw?.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "si" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

fn parse_activity(activo: Option<&str>, status: Option<&str>) -> Activity {
    if let Some(flag) = parse_flag(activo) {
        return if flag {
            Activity::Active
        } else {
            Activity::Inactive
        };
    }
    match status.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
        Some("active") => Activity::Active,
        Some("inactive") => Activity::Inactive,
        _ => Activity::Any,
    }
}

fn parse_category(raw: &str) -> Option<String> {
    let name = raw.trim();
    if name.is_empty() || name.eq_ignore_ascii_case("all") {
        return None;
    }
    let allowed = |c: char| {
        c.is_alphanumeric() || matches!(c, ' ' | '-' | '_' | '.' | '&' | '/' | ',')
    };
    (name.chars().count() <= MAX_TEXT_LEN && name.chars().all(allowed)).then(|| name.to_string())
}

fn parse_search(raw: &str) -> Option<String> {
    let term = raw.trim();
    if term.is_empty() {
        return None;
    }
    Some(term.chars().take(MAX_TEXT_LEN).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn storefront(pairs: &[(&str, &str)]) -> FilterSet {
        FilterSet::normalize(&params(pairs), ListingProfile::storefront())
    }

    #[test]
    fn empty_query_uses_storefront_defaults() {
        let filters = storefront(&[]);
        assert_eq!(filters.page(), 1);
        assert_eq!(filters.page_size(), STOREFRONT_PAGE_SIZE);
        assert_eq!(filters.sort_key(), SortKey::Name);
        assert_eq!(filters.sort_direction(), SortDirection::Ascending);
        assert_eq!(filters.activity(), Activity::Active);
        assert!(filters.visible_categories_only());
        assert!(!filters.featured_only());
        assert!(filters.category_name().is_none());
        assert!(filters.search_term().is_none());
    }

    #[test]
    fn malformed_page_and_limit_degrade() {
        for raw in ["abc", "-4", "0", "", "1.5", "99999999999999999999999"] {
            let filters = storefront(&[("page", raw), ("limit", raw)]);
            assert_eq!(filters.page(), 1, "page for {raw:?}");
            assert_eq!(filters.page_size(), STOREFRONT_PAGE_SIZE, "limit for {raw:?}");
        }
    }

    #[test]
    fn huge_values_are_clamped() {
        let filters = storefront(&[("page", "18446744073709551615"), ("limit", "5000")]);
        assert_eq!(filters.page(), MAX_PAGE);
        assert_eq!(filters.page_size(), MAX_PAGE_SIZE);
    }

    #[test]
    fn bad_price_bounds_are_dropped_not_zeroed() {
        let filters = storefront(&[("minPrice", "NaN"), ("maxPrice", "-3")]);
        assert_eq!(filters.min_price(), None);
        assert_eq!(filters.max_price(), None);

        let filters = storefront(&[("minPrice", "0"), ("maxPrice", "inf")]);
        assert_eq!(filters.min_price(), Some(0.0));
        assert_eq!(filters.max_price(), None);
    }

    #[test]
    fn sort_aliases_and_fallback() {
        assert_eq!(storefront(&[("sortBy", "precio")]).sort_key(), SortKey::Price);
        assert_eq!(
            storefront(&[("sortBy", "calificacion_promedio")]).sort_key(),
            SortKey::Rating
        );
        assert_eq!(storefront(&[("sortBy", "createdAt")]).sort_key(), SortKey::CreatedAt);

        let filters = storefront(&[("sortBy", "'; DROP TABLE products; --"), ("order", "sideways")]);
        assert_eq!(filters.sort_key(), SortKey::Name);
        assert_eq!(filters.sort_direction(), SortDirection::Ascending);

        assert_eq!(
            storefront(&[("order", "DESC")]).sort_direction(),
            SortDirection::Descending
        );
    }

    #[test]
    fn unknown_sort_key_is_name_ascending_for_admin_too() {
        let admin = |pairs: &[(&str, &str)]| FilterSet::normalize(&params(pairs), ListingProfile::admin());

        let filters = admin(&[("sortBy", "'; DROP TABLE products; --")]);
        assert_eq!(filters.sort_key(), SortKey::Name);
        assert_eq!(filters.sort_direction(), SortDirection::Ascending);
        assert!(filters.sort_requested());

        let filters = admin(&[("sortBy", "bogus"), ("order", "desc")]);
        assert_eq!(filters.sort_direction(), SortDirection::Descending);

        let filters = admin(&[("sortBy", "price")]);
        assert_eq!(filters.sort_key(), SortKey::Price);
        assert_eq!(filters.sort_direction(), SortDirection::Descending);

        assert!(!admin(&[]).sort_requested());
    }

    #[test]
    fn category_all_means_no_filter() {
        assert!(storefront(&[("category", "all")]).category_name().is_none());
        assert!(storefront(&[("category", "  ")]).category_name().is_none());
        assert_eq!(
            storefront(&[("category", "Herramientas Eléctricas")]).category_name(),
            Some("Herramientas Eléctricas")
        );
    }

    #[test]
    fn category_outside_character_class_is_dropped() {
        assert!(storefront(&[("category", "x' OR '1'='1")]).category_name().is_none());
        assert!(storefront(&[("category", "tools;--")]).category_name().is_none());
    }

    #[test]
    fn search_is_trimmed_and_bounded() {
        let long = "a".repeat(500);
        let filters = storefront(&[("search", long.as_str())]);
        assert_eq!(filters.search_term().map(str::len), Some(100));
        assert_eq!(storefront(&[("search", "  martillo ")]).search_term(), Some("martillo"));
        assert!(storefront(&[("search", "   ")]).search_term().is_none());
    }

    #[test]
    fn storefront_ignores_activity_overrides() {
        let filters = storefront(&[("activo", "false"), ("status", "inactive")]);
        assert_eq!(filters.activity(), Activity::Active);
    }

    #[test]
    fn admin_profile_reads_activity_and_defaults() {
        let admin = |pairs: &[(&str, &str)]| FilterSet::normalize(&params(pairs), ListingProfile::admin());

        let filters = admin(&[]);
        assert_eq!(filters.activity(), Activity::Any);
        assert_eq!(filters.page_size(), ADMIN_PAGE_SIZE);
        assert_eq!(filters.sort_key(), SortKey::CreatedAt);
        assert_eq!(filters.sort_direction(), SortDirection::Descending);
        assert!(!filters.visible_categories_only());

        assert_eq!(admin(&[("activo", "true")]).activity(), Activity::Active);
        assert_eq!(admin(&[("activo", "false")]).activity(), Activity::Inactive);
        assert_eq!(admin(&[("status", "inactive")]).activity(), Activity::Inactive);
        assert_eq!(admin(&[("activo", "maybe")]).activity(), Activity::Any);
    }

    #[test]
    fn featured_flag_spellings() {
        assert!(storefront(&[("featured", "true")]).featured_only());
        assert!(storefront(&[("featured", "1")]).featured_only());
        assert!(!storefront(&[("featured", "nope")]).featured_only());
    }

    #[test]
    fn pinned_category_goes_through_the_character_class() {
        let base = storefront(&[]);
        assert_eq!(
            base.clone().with_category("Pinturas").unwrap().category_name(),
            Some("Pinturas")
        );
        assert!(base.clone().with_category("all").unwrap().category_name().is_none());
        assert!(base.with_category("a\"; --").is_none());
    }

    #[test]
    fn pinned_search_must_not_be_blank() {
        let base = storefront(&[("search", "ignored")]);
        assert_eq!(
            base.clone().with_search(" taladro ").unwrap().search_term(),
            Some("taladro")
        );
        assert!(base.clone().with_search("   ").is_none());
        assert!(base.with_search("").is_none());
    }

    #[test]
    fn custom_profile_page_size_is_bounded() {
        let profile = ListingProfile::storefront().with_default_page_size(1000);
        assert_eq!(profile.default_page_size(), MAX_PAGE_SIZE);
        let profile = ListingProfile::admin().with_default_page_size(0);
        assert_eq!(profile.default_page_size(), 1);
    }

    #[test]
    fn user_filters_recognise_roles_and_activity() {
        let filters = UserFilterSet::normalize(
            &params(&[("tipo_usuario", "cliente"), ("activo", "true"), ("page", "3")]),
            ListingProfile::admin(),
        );
        assert_eq!(filters.role(), Some(&Roles::Customer));
        assert_eq!(filters.activity(), Activity::Active);
        assert_eq!(filters.page(), 3);

        let filters = UserFilterSet::normalize(
            &params(&[("role", "root"), ("activo", "all")]),
            ListingProfile::admin(),
        );
        assert_eq!(filters.role(), None);
        assert_eq!(filters.activity(), Activity::Any);
    }
}
