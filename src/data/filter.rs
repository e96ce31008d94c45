//! Categorical Filter Module
//! Multi-select filters over categorical columns, combined with AND.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use polars::prelude::*;

use crate::config::FilterSpec;

// ---------------------------------------------------------------------------
// Categorical values and filter state
// ---------------------------------------------------------------------------

/// A cell of a categorical column in its string form; `None` is a missing cell.
pub type CategoryValue = Option<String>;

/// Per-column selection state: maps column_name → set of allowed values.
/// A column absent from the map is not filtered. An empty set hides every row.
pub type FilterState = BTreeMap<String, BTreeSet<CategoryValue>>;

/// Label shown for missing cells in the filter widgets.
pub const MISSING_LABEL: &str = "(missing)";

pub fn category_label(value: &CategoryValue) -> &str {
    value.as_deref().unwrap_or(MISSING_LABEL)
}

/// A filterable column that exists in the uploaded table.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterColumn {
    pub column: String,
    pub label: String,
    /// Distinct values in first-encountered order.
    pub options: Vec<CategoryValue>,
}

/// Values of `column` cast to text, one per row.
fn category_values(df: &DataFrame, column: &str) -> PolarsResult<Vec<CategoryValue>> {
    let as_text = df.column(column)?.cast(&DataType::String)?;
    Ok(as_text
        .str()?
        .into_iter()
        .map(|v| v.map(str::to_string))
        .collect())
}

/// Distinct values of `column`, in the order they first appear.
pub fn distinct_values(df: &DataFrame, column: &str) -> PolarsResult<Vec<CategoryValue>> {
    let mut seen = HashSet::new();
    Ok(category_values(df, column)?
        .into_iter()
        .filter(|v| seen.insert(v.clone()))
        .collect())
}

/// Resolve configured filters against the table; columns it lacks are skipped.
pub fn discover_filter_columns(
    df: &DataFrame,
    specs: &[FilterSpec],
) -> PolarsResult<Vec<FilterColumn>> {
    let mut columns = Vec::new();
    for spec in specs {
        if df.column(&spec.column).is_err() {
            continue;
        }
        columns.push(FilterColumn {
            column: spec.column.clone(),
            label: spec.label.clone(),
            options: distinct_values(df, &spec.column)?,
        });
    }
    Ok(columns)
}

/// Initialise a [`FilterState`] with every value selected.
pub fn init_filter_state(columns: &[FilterColumn]) -> FilterState {
    columns
        .iter()
        .map(|c| (c.column.clone(), c.options.iter().cloned().collect()))
        .collect()
}

/// Rows of `df` that pass the selection for `column` alone.
fn narrow(df: &DataFrame, column: &str, state: &FilterState) -> PolarsResult<DataFrame> {
    match state.get(column) {
        Some(allowed) => {
            let mut single = FilterState::new();
            single.insert(column.to_string(), allowed.clone());
            apply_filters(df, &single)
        }
        None => Ok(df.clone()),
    }
}

/// Options of each filter given the current selections.
///
/// Filters cascade in order: a filter offers only the values present in the
/// rows that pass every filter before it.
pub fn available_filter_options(
    df: &DataFrame,
    columns: &[FilterColumn],
    state: &FilterState,
) -> PolarsResult<Vec<FilterColumn>> {
    let mut narrowed = df.clone();
    let mut resolved = Vec::with_capacity(columns.len());

    for column in columns {
        let options = distinct_values(&narrowed, &column.column)?;
        narrowed = narrow(&narrowed, &column.column, state)?;
        resolved.push(FilterColumn {
            options,
            ..column.clone()
        });
    }
    Ok(resolved)
}

/// Cascade the filters like [`available_filter_options`], resetting any
/// filter whose options differ from `shown` to select all of its new options.
pub fn reset_stale_selections(
    df: &DataFrame,
    shown: &[FilterColumn],
    state: &mut FilterState,
) -> PolarsResult<Vec<FilterColumn>> {
    let mut narrowed = df.clone();
    let mut resolved = Vec::with_capacity(shown.len());

    for column in shown {
        let options = distinct_values(&narrowed, &column.column)?;
        if options != column.options || !state.contains_key(&column.column) {
            log::debug!(
                "{}: options changed ({} -> {}), selecting all",
                column.column,
                column.options.len(),
                options.len()
            );
            state.insert(column.column.clone(), options.iter().cloned().collect());
        }
        narrowed = narrow(&narrowed, &column.column, state)?;
        resolved.push(FilterColumn {
            options,
            ..column.clone()
        });
    }
    Ok(resolved)
}

/// Return the rows that pass every active filter, as a new DataFrame.
///
/// A row passes a column filter when its value for that column is in the
/// allowed set. Filters on columns the frame does not have are ignored.
pub fn apply_filters(df: &DataFrame, filters: &FilterState) -> PolarsResult<DataFrame> {
    let mut keep = vec![true; df.height()];

    for (column, allowed) in filters {
        if df.column(column).is_err() {
            continue;
        }
        for (flag, value) in keep.iter_mut().zip(category_values(df, column)?) {
            *flag = *flag && allowed.contains(&value);
        }
    }

    let mask: BooleanChunked = keep.into_iter().map(Some).collect();
    df.filter(&mask)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DashboardConfig;
    use proptest::prelude::*;

    fn sample() -> DataFrame {
        df!(
            "Make" => ["Toyota", "Ford", "Toyota", "Ford", "Toyota"],
            "Colour" => [Some("Red"), Some("Red"), Some("Blue"), Some("Blue"), None],
            "Price" => [10000.0, 12000.0, 14000.0, 16000.0, 18000.0],
        )
        .unwrap()
    }

    fn select(values: &[&str]) -> BTreeSet<CategoryValue> {
        values.iter().map(|v| Some(v.to_string())).collect()
    }

    fn makes(df: &DataFrame) -> Vec<String> {
        df.column("Make")
            .unwrap()
            .str()
            .unwrap()
            .into_iter()
            .map(|v| v.unwrap_or_default().to_string())
            .collect()
    }

    #[test]
    fn test_distinct_values_first_seen_order() {
        let values = distinct_values(&sample(), "Colour").unwrap();
        assert_eq!(
            values,
            vec![Some("Red".to_string()), Some("Blue".to_string()), None]
        );
    }

    #[test]
    fn test_discover_skips_missing_columns() {
        let df = df!("Make" => ["Toyota", "Ford"]).unwrap();
        let columns = discover_filter_columns(&df, &DashboardConfig::default().filters).unwrap();

        assert_eq!(columns.len(), 1);
        assert_eq!(columns[0].column, "Make");
        assert_eq!(columns[0].label, "Select Brand");
    }

    #[test]
    fn test_default_state_keeps_all_rows() {
        let df = sample();
        let columns = discover_filter_columns(&df, &DashboardConfig::default().filters).unwrap();
        let state = init_filter_state(&columns);

        let filtered = apply_filters(&df, &state).unwrap();
        assert!(filtered.equals_missing(&df));
    }

    #[test]
    fn test_and_semantics_across_columns() {
        let df = sample();
        let mut state = FilterState::new();
        state.insert("Colour".to_string(), select(&["Red"]));
        state.insert("Make".to_string(), select(&["Toyota"]));

        let filtered = apply_filters(&df, &state).unwrap();

        assert_eq!(filtered.height(), 1);
        assert_eq!(makes(&filtered), vec!["Toyota"]);
        let prices: Vec<Option<f64>> = filtered
            .column("Price")
            .unwrap()
            .f64()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(prices, vec![Some(10000.0)]);
    }

    #[test]
    fn test_empty_selection_yields_no_rows() {
        let df = sample();
        let mut state = FilterState::new();
        state.insert("Colour".to_string(), BTreeSet::new());

        let filtered = apply_filters(&df, &state).unwrap();
        assert_eq!(filtered.height(), 0);
        assert_eq!(filtered.width(), df.width());
    }

    #[test]
    fn test_missing_value_is_selectable() {
        let df = sample();
        let mut state = FilterState::new();
        state.insert("Colour".to_string(), [None].into_iter().collect());

        let filtered = apply_filters(&df, &state).unwrap();
        assert_eq!(filtered.height(), 1);
        assert_eq!(category_label(&None), MISSING_LABEL);
    }

    #[test]
    fn test_filter_on_absent_column_is_ignored() {
        let df = sample();
        let mut state = FilterState::new();
        state.insert("Trim".to_string(), BTreeSet::new());

        let filtered = apply_filters(&df, &state).unwrap();
        assert_eq!(filtered.height(), df.height());
    }

    fn options(columns: &[FilterColumn], column: &str) -> Vec<CategoryValue> {
        columns
            .iter()
            .find(|c| c.column == column)
            .map(|c| c.options.clone())
            .unwrap_or_default()
    }

    #[test]
    fn test_make_options_follow_colour_selection() {
        let df = sample();
        let columns = discover_filter_columns(&df, &DashboardConfig::default().filters).unwrap();
        let mut state = init_filter_state(&columns);
        state.insert("Colour".to_string(), select(&["Red"]));

        let available = available_filter_options(&df, &columns, &state).unwrap();

        assert_eq!(options(&available, "Colour"), options(&columns, "Colour"));
        assert_eq!(
            options(&available, "Make"),
            vec![Some("Toyota".to_string()), Some("Ford".to_string())]
        );

        state.insert("Colour".to_string(), [None].into_iter().collect());
        let available = available_filter_options(&df, &columns, &state).unwrap();
        assert_eq!(options(&available, "Make"), vec![Some("Toyota".to_string())]);
    }

    #[test]
    fn test_reset_selects_all_new_options() {
        let df = sample();
        let columns = discover_filter_columns(&df, &DashboardConfig::default().filters).unwrap();
        let mut state = init_filter_state(&columns);
        state.insert("Colour".to_string(), [None].into_iter().collect());
        state.insert("Make".to_string(), select(&["Ford"]));

        let shown = reset_stale_selections(&df, &columns, &mut state).unwrap();

        assert_eq!(options(&shown, "Make"), vec![Some("Toyota".to_string())]);
        assert_eq!(state["Make"], select(&["Toyota"]));
        assert_eq!(apply_filters(&df, &state).unwrap().height(), 1);
    }

    #[test]
    fn test_unchanged_options_keep_selection() {
        let df = sample();
        let columns = discover_filter_columns(&df, &DashboardConfig::default().filters).unwrap();
        let mut state = init_filter_state(&columns);
        state.insert("Make".to_string(), select(&["Ford"]));

        let shown = reset_stale_selections(&df, &columns, &mut state).unwrap();

        assert_eq!(shown, columns);
        assert_eq!(state["Make"], select(&["Ford"]));
    }

    #[test]
    fn test_no_colour_selected_leaves_no_make_options() {
        let df = sample();
        let columns = discover_filter_columns(&df, &DashboardConfig::default().filters).unwrap();
        let mut state = init_filter_state(&columns);
        state.insert("Colour".to_string(), BTreeSet::new());

        let shown = reset_stale_selections(&df, &columns, &mut state).unwrap();

        assert!(options(&shown, "Make").is_empty());
        assert!(state["Make"].is_empty());
        assert_eq!(apply_filters(&df, &state).unwrap().height(), 0);
    }

    proptest! {
        #[test]
        fn prop_filtered_rows_match_selection(red in any::<bool>(), blue in any::<bool>(), toyota in any::<bool>(), ford in any::<bool>()) {
            let df = sample();
            let mut colours = BTreeSet::new();
            if red { colours.insert(Some("Red".to_string())); }
            if blue { colours.insert(Some("Blue".to_string())); }
            let mut brands = BTreeSet::new();
            if toyota { brands.insert(Some("Toyota".to_string())); }
            if ford { brands.insert(Some("Ford".to_string())); }

            let mut state = FilterState::new();
            state.insert("Colour".to_string(), colours.clone());
            state.insert("Make".to_string(), brands.clone());

            let filtered = apply_filters(&df, &state).unwrap();

            let expected = category_values(&df, "Colour").unwrap()
                .into_iter()
                .zip(category_values(&df, "Make").unwrap())
                .filter(|(c, m)| colours.contains(c) && brands.contains(m))
                .count();
            prop_assert_eq!(filtered.height(), expected);
            for colour in category_values(&filtered, "Colour").unwrap() {
                prop_assert!(colours.contains(&colour));
            }
        }
    }
}
