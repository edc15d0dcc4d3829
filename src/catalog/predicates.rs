//! Predicate assembly.
//!
//! Each [`Predicate`] is one conjunctive term of a listing query. Values are
//! always carried as bound parameters; the SQL text only ever contains column
//! names chosen here.

use sea_orm::sea_query::{Expr, ExprTrait, Func, IntoColumnRef, LikeExpr};
use sea_orm::{ColumnTrait, Condition, Value};

use super::error::CatalogError;
use super::filters::{Activity, FilterSet, UserFilterSet};
use crate::models::users::Roles;
use crate::models::{categories, products, users};

/// One filtering condition on the product listing.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    ProductActive(bool),
    CategoryVisible,
    CategoryName(String),
    /// Case-insensitive substring over name, description and brand.
    Search(String),
    MinPrice(f64),
    MaxPrice(f64),
    Featured,
}

impl Predicate {
    /// The condition this predicate contributes.
    pub fn condition(&self) -> Result<Condition, CatalogError> {
        let cond = match self {
            Self::ProductActive(active) => Condition::all().add(products::Column::Active.eq(*active)),
            Self::CategoryVisible => Condition::all().add(categories::Column::Active.eq(true)),
            Self::CategoryName(name) => {
                Condition::all().add(categories::Column::Name.eq(name.as_str()))
            }
            Self::Search(term) => contains_any(
                [
                    (products::Entity, products::Column::Name),
                    (products::Entity, products::Column::Description),
                    (products::Entity, products::Column::Brand),
                ],
                &search_pattern(term)?,
            ),
            Self::MinPrice(price) => Condition::all().add(products::Column::Price.gte(price_bound(*price)?)),
            Self::MaxPrice(price) => Condition::all().add(products::Column::Price.lte(price_bound(*price)?)),
            Self::Featured => Condition::all().add(products::Column::Featured.eq(true)),
        };
        Ok(cond)
    }

    /// The parameters this predicate binds, in placeholder order.
    pub fn bound_values(&self) -> Vec<Value> {
        match self {
            Self::ProductActive(active) => vec![(*active).into()],
            Self::CategoryVisible | Self::Featured => vec![true.into()],
            Self::CategoryName(name) => vec![name.as_str().into()],
            Self::Search(term) => {
                let pattern = like_pattern(term);
                vec![pattern.as_str().into(); 3]
            }
            Self::MinPrice(price) | Self::MaxPrice(price) => vec![(*price).into()],
        }
    }
}

/// Convert a filter set into its ordered list of predicates.
///
/// The order is fixed so identical filter sets always produce identical SQL.
pub fn assemble(filters: &FilterSet) -> Vec<Predicate> {
    let mut predicates = Vec::new();

    match filters.activity() {
        Activity::Active => predicates.push(Predicate::ProductActive(true)),
        Activity::Inactive => predicates.push(Predicate::ProductActive(false)),
        Activity::Any => {}
    }
    if filters.visible_categories_only() {
        predicates.push(Predicate::CategoryVisible);
    }
    if let Some(name) = filters.category_name() {
        predicates.push(Predicate::CategoryName(name.to_string()));
    }
    if let Some(term) = filters.search_term() {
        predicates.push(Predicate::Search(term.to_string()));
    }
    if let Some(min) = filters.min_price() {
        predicates.push(Predicate::MinPrice(min));
    }
    if let Some(max) = filters.max_price() {
        predicates.push(Predicate::MaxPrice(max));
    }
    if filters.featured_only() {
        predicates.push(Predicate::Featured);
    }

    predicates
}

/// AND-combine predicates into a single condition.
pub fn conjunction(predicates: &[Predicate]) -> Result<Condition, CatalogError> {
    predicates
        .iter()
        .try_fold(Condition::all(), |cond, predicate| Ok(cond.add(predicate.condition()?)))
}

/// One filtering condition on the admin user listing.
#[derive(Debug, Clone, PartialEq)]
pub enum UserPredicate {
    Active(bool),
    Role(Roles),
    /// Case-insensitive substring over first name, last name and email.
    Search(String),
}

impl UserPredicate {
    pub fn condition(&self) -> Result<Condition, CatalogError> {
        let cond = match self {
            Self::Active(active) => Condition::all().add(users::Column::Active.eq(*active)),
            Self::Role(role) => Condition::all().add(users::Column::Role.eq(role.clone())),
            Self::Search(term) => contains_any(
                [
                    (users::Entity, users::Column::FirstName),
                    (users::Entity, users::Column::LastName),
                    (users::Entity, users::Column::Email),
                ],
                &search_pattern(term)?,
            ),
        };
        Ok(cond)
    }
}

pub fn assemble_users(filters: &UserFilterSet) -> Vec<UserPredicate> {
    let mut predicates = Vec::new();

    match filters.activity() {
        Activity::Active => predicates.push(UserPredicate::Active(true)),
        Activity::Inactive => predicates.push(UserPredicate::Active(false)),
        Activity::Any => {}
    }
    if let Some(role) = filters.role() {
        predicates.push(UserPredicate::Role(role.clone()));
    }
    if let Some(term) = filters.search_term() {
        predicates.push(UserPredicate::Search(term.to_string()));
    }

    predicates
}

pub fn user_conjunction(predicates: &[UserPredicate]) -> Result<Condition, CatalogError> {
    predicates
        .iter()
        .try_fold(Condition::all(), |cond, predicate| Ok(cond.add(predicate.condition()?)))
}

/// `LOWER(col) LIKE pattern` for each column, OR-ed into one term.
fn contains_any<C, I>(columns: I, pattern: &str) -> Condition
where
    C: IntoColumnRef,
    I: IntoIterator<Item = C>,
{
    columns.into_iter().fold(Condition::any(), |cond, column| {
        cond.add(
            Expr::expr(Func::lower(Expr::col(column)))
                .like(LikeExpr::new(pattern).escape('\\')),
        )
    })
}

fn search_pattern(term: &str) -> Result<String, CatalogError> {
    if term.trim().is_empty() {
        return Err(CatalogError::invariant("empty search term reached the predicate assembler"));
    }
    Ok(like_pattern(term))
}

fn like_pattern(term: &str) -> String {
    format!("%{}%", escape_like_wildcards(&term.to_lowercase()))
}

fn price_bound(price: f64) -> Result<f64, CatalogError> {
    if price.is_finite() && price >= 0.0 {
        Ok(price)
    } else {
        Err(CatalogError::invariant(format!("price bound {price} is not a non-negative number")))
    }
}

fn escape_like_wildcards(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}
