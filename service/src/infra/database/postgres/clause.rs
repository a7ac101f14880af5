//! [`Clause`] definition.

use std::fmt;

use itertools::Itertools as _;
use postgres_types::ToSql;

use crate::read::listing::list::Predicate;

use super::LikePattern;

/// SQL `WHERE` clause folded from [`Predicate`]s.
///
/// Conditions are joined with `AND` and reference positional parameters
/// starting from `$1`, so the same [`Clause`] may be reused by several
/// statements appending their own parameters after [`Clause::params()`].
#[derive(Debug, Default)]
pub struct Clause {
    /// SQL conditions of this [`Clause`].
    conditions: Vec<String>,

    /// Positional parameters referenced by the [`Clause::conditions`].
    params: Vec<Box<dyn ToSql + Send + Sync>>,
}

impl Clause {
    /// Binds the provided `param`, returning its positional index.
    fn bind(&mut self, param: impl ToSql + Send + Sync + 'static) -> usize {
        self.params.push(Box::new(param));
        self.params.len()
    }

    /// Adds the provided [`Predicate`] to this [`Clause`].
    #[must_use]
    pub fn and(mut self, predicate: Predicate<'_>) -> Self {
        let condition = match predicate {
            Predicate::Status(status) => {
                format!("status = ${}::INT2", self.bind(status))
            }
            Predicate::MinPrice(price) => {
                format!("price >= ${}::NUMERIC", self.bind(price))
            }
            Predicate::MaxPrice(price) => {
                format!("price <= ${}::NUMERIC", self.bind(price))
            }
            Predicate::Kind(kind) => {
                format!("kind = ${}::INT2", self.bind(kind))
            }
            Predicate::MinBedrooms(n) => {
                format!("bedrooms >= ${}::INT4", self.bind(i32::from(n)))
            }
            Predicate::MinBathrooms(n) => {
                format!("bathrooms >= ${}::INT4", self.bind(i32::from(n)))
            }
            Predicate::Location(term) => format!(
                "location ILIKE ${}::VARCHAR ESCAPE '{}'",
                self.bind(LikePattern::containing(term)),
                LikePattern::ESCAPE,
            ),
        };
        self.conditions.push(condition);
        self
    }

    /// Returns the positional parameters of this [`Clause`].
    #[must_use]
    pub fn params(&self) -> Vec<&(dyn ToSql + Sync)> {
        self.params
            .iter()
            .map(|p| -> &(dyn ToSql + Sync) { &**p })
            .collect()
    }
}

impl<'a> FromIterator<Predicate<'a>> for Clause {
    fn from_iter<I: IntoIterator<Item = Predicate<'a>>>(iter: I) -> Self {
        iter.into_iter().fold(Self::default(), Self::and)
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.conditions.is_empty() {
            return f.write_str("true");
        }
        write!(f, "{}", self.conditions.iter().format(" AND "))
    }
}

#[cfg(test)]
mod spec {
    use rust_decimal::Decimal;

    use crate::{
        domain::listing,
        read::listing::list::{Filter, Predicate},
    };

    use super::Clause;

    #[test]
    fn folds_default_filter_into_status() {
        let clause = Filter::default().predicates().collect::<Clause>();

        assert_eq!(clause.to_string(), "status = $1::INT2");
        assert_eq!(clause.params().len(), 1);
    }

    #[test]
    fn numbers_params_in_predicate_order() {
        let filter = Filter {
            min_price: listing::Price::new(Decimal::from(150)),
            max_price: listing::Price::new(Decimal::from(500)),
            kind: Some(listing::Kind::Apartment),
            min_bedrooms: Some(3),
            min_bathrooms: Some(2),
            location: Some("50%".into()),
            status: listing::Status::Rented,
        };
        let clause = filter.predicates().collect::<Clause>();

        assert_eq!(
            clause.to_string(),
            "status = $1::INT2 \
             AND price >= $2::NUMERIC \
             AND price <= $3::NUMERIC \
             AND kind = $4::INT2 \
             AND bedrooms >= $5::INT4 \
             AND bathrooms >= $6::INT4 \
             AND location ILIKE $7::VARCHAR ESCAPE '\\'",
        );
        assert_eq!(clause.params().len(), 7);
        assert_eq!(
            format!("{:?}", clause.params()[6]),
            format!("{:?}", super::LikePattern::containing("50%")),
        );
    }

    #[test]
    fn empty_clause_matches_everything() {
        assert_eq!(Clause::default().to_string(), "true");
        assert_eq!(
            Clause::default()
                .and(Predicate::MinBedrooms(1))
                .to_string(),
            "bedrooms >= $1::INT4",
        );
    }
}
