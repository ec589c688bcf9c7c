//! Defines the core data model and database queries for budget goals.

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{Error, category::CategoryName};

/// Database identifier for a budget goal.
pub type BudgetGoalId = i64;

/// A per-category monthly spending ceiling.
///
/// There is at most one goal per category; setting a goal for a category that
/// already has one replaces its limit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetGoal {
    /// The ID of the budget goal.
    pub id: BudgetGoalId,
    /// The category the goal applies to.
    pub category: CategoryName,
    /// The intended upper bound on monthly spend in the category.
    pub monthly_limit: f64,
    /// When the goal was first created.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// When the goal's limit was last changed.
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Create a budget goal for `category`, or update the existing goal's limit.
///
/// An update changes `monthly_limit` and `updated_at` but keeps the original
/// `created_at`.
///
/// # Errors
/// This function will return an:
/// - [Error::InvalidMonthlyLimit] if `monthly_limit` is zero, negative, or
///   not finite,
/// - or [Error::SqlError] if there is an SQL error.
pub fn upsert_budget_goal(
    category: CategoryName,
    monthly_limit: f64,
    connection: &Connection,
) -> Result<BudgetGoal, Error> {
    if !monthly_limit.is_finite() || monthly_limit <= 0.0 {
        return Err(Error::InvalidMonthlyLimit(monthly_limit));
    }

    let now = OffsetDateTime::now_utc();

    let budget_goal = connection
        .prepare(
            "INSERT INTO budget_goal (category, monthly_limit, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?3)
             ON CONFLICT(category) DO UPDATE
                SET monthly_limit = excluded.monthly_limit,
                    updated_at = excluded.updated_at
             RETURNING id, category, monthly_limit, created_at, updated_at",
        )?
        .query_row((category.as_ref(), monthly_limit, now), map_budget_goal_row)?;

    Ok(budget_goal)
}

/// Retrieve all budget goals, ordered alphabetically by category.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is an SQL error.
pub fn get_all_budget_goals(connection: &Connection) -> Result<Vec<BudgetGoal>, Error> {
    connection
        .prepare(
            "SELECT id, category, monthly_limit, created_at, updated_at
             FROM budget_goal ORDER BY category ASC;",
        )?
        .query_map([], map_budget_goal_row)?
        .map(|maybe_goal| maybe_goal.map_err(|error| error.into()))
        .collect()
}

/// Create the budget goal table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_budget_goal_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS budget_goal (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            category TEXT NOT NULL UNIQUE,
            monthly_limit REAL NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );",
    )?;

    Ok(())
}

fn map_budget_goal_row(row: &Row) -> Result<BudgetGoal, rusqlite::Error> {
    let id = row.get(0)?;
    let raw_category: String = row.get(1)?;
    let monthly_limit = row.get(2)?;
    let created_at = row.get(3)?;
    let updated_at = row.get(4)?;

    Ok(BudgetGoal {
        id,
        category: CategoryName::new_unchecked(&raw_category),
        monthly_limit,
        created_at,
        updated_at,
    })
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod budget_goal_tests {
    use rusqlite::Connection;

    use crate::{Error, category::CategoryName, db::initialize};

    use super::{get_all_budget_goals, upsert_budget_goal};

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    #[test]
    fn upsert_creates_goal() {
        let conn = get_test_connection();

        let goal = upsert_budget_goal(CategoryName::new_unchecked("Groceries"), 400.0, &conn)
            .expect("Could not create budget goal");

        assert!(goal.id > 0);
        assert_eq!(goal.category.as_ref(), "Groceries");
        assert_eq!(goal.monthly_limit, 400.0);
        assert_eq!(goal.created_at, goal.updated_at);
    }

    #[test]
    fn upsert_replaces_existing_goal_for_category() {
        let conn = get_test_connection();
        let category = CategoryName::new_unchecked("Groceries");

        let first = upsert_budget_goal(category.clone(), 400.0, &conn)
            .expect("Could not create budget goal");
        let second = upsert_budget_goal(category, 500.0, &conn)
            .expect("Could not update budget goal");

        assert_eq!(first.id, second.id);
        assert_eq!(second.monthly_limit, 500.0);
        assert_eq!(first.created_at, second.created_at);

        let goals = get_all_budget_goals(&conn).expect("Could not get budget goals");
        assert_eq!(goals.len(), 1);
        assert_eq!(goals[0].monthly_limit, 500.0);
    }

    #[test]
    fn upsert_rejects_non_positive_limit() {
        let conn = get_test_connection();

        let zero = upsert_budget_goal(CategoryName::new_unchecked("Groceries"), 0.0, &conn);
        let negative = upsert_budget_goal(CategoryName::new_unchecked("Groceries"), -50.0, &conn);

        assert_eq!(zero, Err(Error::InvalidMonthlyLimit(0.0)));
        assert_eq!(negative, Err(Error::InvalidMonthlyLimit(-50.0)));
    }

    #[test]
    fn get_all_orders_by_category() {
        let conn = get_test_connection();
        for (category, limit) in [("Transport", 150.0), ("Groceries", 400.0), ("Rent", 1200.0)] {
            upsert_budget_goal(CategoryName::new_unchecked(category), limit, &conn)
                .expect("Could not create budget goal");
        }

        let goals = get_all_budget_goals(&conn).expect("Could not get budget goals");

        let categories: Vec<_> = goals
            .iter()
            .map(|goal| goal.category.as_ref().to_owned())
            .collect();
        assert_eq!(categories, vec!["Groceries", "Rent", "Transport"]);
    }

    #[test]
    fn get_all_with_no_goals_returns_empty_vector() {
        let conn = get_test_connection();

        let goals = get_all_budget_goals(&conn).expect("Could not get budget goals");

        assert!(goals.is_empty());
    }
}
