//! Calorie sources described by tags
//!
//! A tag specification such as
//! `homemade(homemade);ordered(eatfit,ordered,dominos);milk-and-cereal(milk)`
//! names one source per clause, each with the sub tags that identify it
//! inside food item names.

use std::collections::HashSet;

use log::{debug, warn};

use crate::lib::{
    entry::{self, FoodItem},
    error::{ClauseDefect, Error, Result},
};

const CLAUSE_SEPARATOR: char = ';';
const TAG_SEPARATOR: char = ',';

/// One named source and its sub tags
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    name: String,
    tags: Vec<String>,
}

impl Category {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Sub tags are matched as written against the lower-cased item name
    pub fn matches(&self, item: &FoodItem) -> bool {
        let name = item.name.to_lowercase();
        self.tags.iter().any(|tag| name.contains(tag.as_str()))
    }

    /// Calories of all items matching at least one sub tag
    ///
    /// An item counts once for this category even if several sub tags match.
    pub fn calories(&self, items: &[FoodItem]) -> Result<i64> {
        entry::sum_calories(
            items
                .iter()
                .filter(|item| self.matches(item))
                .map(|item| item.calories),
            &format!("the calories of '{}'", self.name),
        )
    }

    /// Parse a single `name(sub1,sub2,...)` clause
    fn parse(clause: &str) -> Result<Self> {
        if clause.matches('(').count() != 1 || clause.matches(')').count() != 1 {
            return Err(Error::MalformedClause {
                clause: clause.to_string(),
                defect: ClauseDefect::BracketCount,
            });
        }
        if !clause.ends_with(')') {
            return Err(Error::MalformedClause {
                clause: clause.to_string(),
                defect: ClauseDefect::Unterminated,
            });
        }
        let (name, rest) = clause.split_once('(').ok_or_else(|| Error::MalformedClause {
            clause: clause.to_string(),
            defect: ClauseDefect::BracketCount,
        })?;
        if name.is_empty() {
            return Err(Error::EmptyCategoryName(clause.to_string()));
        }
        let inner = &rest[..rest.len() - 1];
        let tags = inner
            .split(TAG_SEPARATOR)
            .map(String::from)
            .collect::<Vec<_>>();
        if tags.is_empty() {
            return Err(Error::NoSubTags(clause.to_string()));
        }
        Ok(Self {
            name: name.to_string(),
            tags,
        })
    }
}

/// Parsed tag specification, categories in the order they were written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagSpec {
    categories: Vec<Category>,
}

/// Share of the total intake attributed to one category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryShare {
    pub name: String,
    pub calories: i64,
    pub percentage: i64,
}

impl TagSpec {
    /// Validate a whole specification
    ///
    /// Fails on the first bad clause, no partial specification is returned.
    pub fn parse(spec: &str) -> Result<Self> {
        let clauses = spec.trim().split(CLAUSE_SEPARATOR).collect::<Vec<_>>();
        if clauses.len() < 2 {
            return Err(Error::InsufficientCategories(clauses.len()));
        }
        let mut seen = HashSet::new();
        let mut categories = Vec::new();
        for clause in clauses {
            let cat = Category::parse(clause)?;
            if !seen.insert(cat.name.clone()) {
                return Err(Error::DuplicateCategoryName(cat.name));
            }
            categories.push(cat);
        }
        Ok(Self { categories })
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Percentage of all calories attributed to each category
    ///
    /// The denominator is the intake of every item, matched or not, and
    /// an item may count toward several categories. Shares therefore need
    /// not add up to 100.
    pub fn attribute(&self, items: &[FoodItem]) -> Result<Vec<CategoryShare>> {
        let total = entry::sum_calories(items.iter().map(|item| item.calories), "the total")?;
        if total == 0 {
            return Err(Error::DivisionByZero);
        }
        debug!("{} items, {} calories in total", items.len(), total);
        self.categories
            .iter()
            .map(|cat| -> Result<CategoryShare> {
                let calories = cat.calories(items)?;
                if calories == 0 {
                    warn!("no calories matched source '{}' with tags {:?}", cat.name(), cat.tags());
                }
                Ok(CategoryShare {
                    name: cat.name.clone(),
                    calories,
                    percentage: percentage(calories, total)
                        .ok_or_else(|| Error::Overflow(format!("the share of '{}'", cat.name)))?,
                })
            })
            .collect()
    }
}

/// `100 * part / total` truncated toward zero, `None` if it does not fit
fn percentage(part: i64, total: i64) -> Option<i64> {
    let pct = 100 * i128::from(part) / i128::from(total);
    i64::try_from(pct).ok()
}

#[cfg(test)]
mod test {
    use super::*;

    macro_rules! spec {
        ( $( $name:literal : [ $( $tag:literal ),* ] ),* ) => {
            TagSpec {
                categories: vec![ $( Category {
                    name: $name.to_string(),
                    tags: vec![ $( $tag.to_string() ),* ],
                } ),* ],
            }
        };
    }

    macro_rules! fails {
        ( $s:expr => $p:pat ) => {
            match TagSpec::parse($s) {
                Err($p) => (),
                other => panic!("parsing {:?}: unexpected {:?}", $s, other),
            }
        };
    }

    macro_rules! share {
        ( $name:literal, $cal:expr, $pct:expr ) => {
            CategoryShare {
                name: $name.to_string(),
                calories: $cal,
                percentage: $pct,
            }
        };
    }

    #[test]
    fn parse_valid() {
        assert_eq!(TagSpec::parse("a(x,y);b(z)").unwrap(), spec!("a": ["x", "y"], "b": ["z"]));
        assert_eq!(
            TagSpec::parse("  homemade(homemade);ordered(eatfit,ordered,khannas,dominos);milk-and-cereal(milk)\n").unwrap(),
            spec!(
                "homemade": ["homemade"],
                "ordered": ["eatfit", "ordered", "khannas", "dominos"],
                "milk-and-cereal": ["milk"]
            )
        );
        // empty brackets give a single empty tag
        assert_eq!(TagSpec::parse("a();b(z)").unwrap(), spec!("a": [""], "b": ["z"]));
    }

    #[test]
    fn parse_keeps_clause_order() {
        let spec = TagSpec::parse("zeta(z);alpha(a);mid(m)").unwrap();
        let names = spec.categories().iter().map(Category::name).collect::<Vec<_>>();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn parse_invalid() {
        fails!("" => Error::InsufficientCategories(1));
        fails!("a(x)" => Error::InsufficientCategories(1));
        fails!("a(x);a(y)" => Error::DuplicateCategoryName(_));
        fails!("a(x);b z" => Error::MalformedClause { defect: ClauseDefect::BracketCount, .. });
        fails!("a(x);b((z)" => Error::MalformedClause { defect: ClauseDefect::BracketCount, .. });
        fails!("a(x);b(z)w" => Error::MalformedClause { defect: ClauseDefect::Unterminated, .. });
        fails!("a(x);b)z(" => Error::MalformedClause { defect: ClauseDefect::Unterminated, .. });
        fails!("a(x);b(y);" => Error::MalformedClause { .. });
        fails!("a(x);(y)" => Error::EmptyCategoryName(_));
    }

    #[test]
    fn first_bad_clause_wins() {
        fails!("(x);b z" => Error::EmptyCategoryName(_));
        fails!("a(x);a(y);c" => Error::DuplicateCategoryName(_));
    }

    #[test]
    fn attribution() {
        let items = vec![
            FoodItem::new("Homemade Dal", 300),
            FoodItem::new("Dominos Pizza", 700),
        ];
        let spec = TagSpec::parse("home(homemade);order(dominos)").unwrap();
        assert_eq!(
            spec.attribute(&items).unwrap(),
            vec![share!("home", 300, 30), share!("order", 700, 70)]
        );
    }

    #[test]
    fn attribution_counts_item_once_per_category() {
        let items = vec![
            FoodItem::new("Ordered homemade-style dal", 200),
            FoodItem::new("Cereal with milk", 300),
            FoodItem::new("Water", 500),
        ];
        let spec = TagSpec::parse("order(ordered,dal,style);home(homemade);milk(milk)").unwrap();
        assert_eq!(
            spec.attribute(&items).unwrap(),
            vec![
                share!("order", 200, 20),
                share!("home", 200, 20),
                share!("milk", 300, 30),
            ]
        );
    }

    #[test]
    fn tags_are_case_sensitive() {
        let items = vec![FoodItem::new("Homemade Dal", 300), FoodItem::new("Rice", 100)];
        let spec = TagSpec::parse("upper(Homemade);lower(homemade)").unwrap();
        assert_eq!(
            spec.attribute(&items).unwrap(),
            vec![share!("upper", 0, 0), share!("lower", 300, 75)]
        );
    }

    #[test]
    fn truncating_percentages() {
        let items = vec![
            FoodItem::new("a", 1),
            FoodItem::new("b", 1),
            FoodItem::new("c", 1),
        ];
        let spec = TagSpec::parse("x(a);y(b,c)").unwrap();
        assert_eq!(
            spec.attribute(&items).unwrap(),
            vec![share!("x", 1, 33), share!("y", 2, 66)]
        );
    }

    #[test]
    fn zero_total() {
        let spec = TagSpec::parse("a(x);b(y)").unwrap();
        assert!(matches!(spec.attribute(&[]), Err(Error::DivisionByZero)));
        let items = vec![FoodItem::new("x", 0)];
        assert!(matches!(spec.attribute(&items), Err(Error::DivisionByZero)));
    }

    #[test]
    fn large_counts() {
        let items = vec![
            FoodItem::new("Homemade Dal", i64::MAX / 10),
            FoodItem::new("Rice", 1),
        ];
        let spec = TagSpec::parse("home(homemade);rice(rice)").unwrap();
        let shares = spec.attribute(&items).unwrap();
        assert_eq!(shares[0].percentage, 99);
        assert_eq!(shares[1].percentage, 0);
    }

    #[test]
    fn overflowing_counts() {
        let spec = TagSpec::parse("home(homemade);rice(rice)").unwrap();
        let items = vec![
            FoodItem::new("Homemade Dal", i64::MAX),
            FoodItem::new("Rice", 1),
        ];
        match spec.attribute(&items) {
            Err(Error::Overflow(what)) => assert_eq!(what, "the total"),
            other => panic!("expected overflow, got {:?}", other),
        }
        // the total fits but one share does not
        let items = vec![
            FoodItem::new("Homemade Dal", i64::MAX),
            FoodItem::new("Rice", -i64::MAX + 1),
        ];
        match spec.attribute(&items) {
            Err(Error::Overflow(what)) => assert_eq!(what, "the share of 'home'"),
            other => panic!("expected overflow, got {:?}", other),
        }
    }

    #[test]
    fn idempotent() {
        let items = vec![FoodItem::new("Homemade Dal", 300), FoodItem::new("Milk", 100)];
        let spec = TagSpec::parse("home(homemade);milk(milk)").unwrap();
        assert_eq!(spec.attribute(&items).unwrap(), spec.attribute(&items).unwrap());
    }
}
