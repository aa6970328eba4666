use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Sort direction of a column. `Ascending` is the +1 polarity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Ascending,
    Descending,
}

impl Direction {
    pub fn sign(self) -> i8 {
        match self {
            Direction::Ascending => 1,
            Direction::Descending => -1,
        }
    }

    pub fn flip(self) -> Direction {
        match self {
            Direction::Ascending => Direction::Descending,
            Direction::Descending => Direction::Ascending,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:+}", self.sign())
    }
}

/// Sort state of one table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum SortState {
    #[default]
    Unset,
    Sorted { column: usize, direction: Direction },
}

impl SortState {
    /// Transition for an activation of `column`.
    ///
    /// The same column flips direction, any other column (or an unsorted
    /// table) starts at `Ascending`.
    pub fn activate(self, column: usize) -> SortState {
        let direction = match self {
            SortState::Sorted {
                column: current,
                direction,
            } if current == column => direction.flip(),
            _ => Direction::Ascending,
        };
        SortState::Sorted { column, direction }
    }

    pub fn sorted_column(self) -> Option<usize> {
        match self {
            SortState::Unset => None,
            SortState::Sorted { column, .. } => Some(column),
        }
    }

    /// Direction shown for `column`: `None` unless it is the sorted column.
    pub fn direction_of(self, column: usize) -> Option<Direction> {
        match self {
            SortState::Sorted {
                column: current,
                direction,
            } if current == column => Some(direction),
            _ => None,
        }
    }
}

impl fmt::Display for SortState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortState::Unset => write!(f, "unsorted"),
            SortState::Sorted { column, direction } => {
                write!(f, "column {column} ({direction})")
            }
        }
    }
}

/// Identity of a registered table, rendered as `table-N`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct TableId(pub usize);

impl fmt::Display for TableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "table-{}", self.0)
    }
}

impl FromStr for TableId {
    type Err = String;

    /// Accepts `table-N` as well as a bare `N`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let digits = s.strip_prefix("table-").unwrap_or(s);
        digits
            .parse()
            .map(TableId)
            .map_err(|_| format!("invalid table id '{s}' (expected 'table-N' or 'N')"))
    }
}

impl From<TableId> for String {
    fn from(id: TableId) -> Self {
        id.to_string()
    }
}

impl TryFrom<String> for TableId {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// Per-table sort states, owned by the host.
///
/// Entries are created on first use and stay until `remove` is called for
/// the table, so a long-lived host tears down tables it drops from its tree.
#[derive(Debug, Default)]
pub struct SortRegistry {
    states: HashMap<TableId, SortState>,
}

impl SortRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_create(&mut self, table: TableId) -> &mut SortState {
        self.states.entry(table).or_default()
    }

    pub fn get(&self, table: TableId) -> Option<SortState> {
        self.states.get(&table).copied()
    }

    pub fn set(&mut self, table: TableId, state: SortState) {
        self.states.insert(table, state);
    }

    pub fn remove(&mut self, table: TableId) -> Option<SortState> {
        self.states.remove(&table)
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted(column: usize, direction: Direction) -> SortState {
        SortState::Sorted { column, direction }
    }

    #[test]
    fn test_first_activation_is_ascending() {
        assert_eq!(
            SortState::Unset.activate(2),
            sorted(2, Direction::Ascending)
        );
    }

    #[test]
    fn test_same_column_toggles() {
        let mut state = SortState::Unset;
        let expected = [
            Direction::Ascending,
            Direction::Descending,
            Direction::Ascending,
            Direction::Descending,
        ];
        for direction in expected {
            state = state.activate(1);
            assert_eq!(state, sorted(1, direction));
        }
    }

    #[test]
    fn test_other_column_resets_direction() {
        let state = sorted(0, Direction::Descending);
        assert_eq!(state.activate(3), sorted(3, Direction::Ascending));

        let state = sorted(0, Direction::Ascending);
        assert_eq!(state.activate(3), sorted(3, Direction::Ascending));
    }

    #[test]
    fn test_direction_of() {
        let state = sorted(1, Direction::Descending);
        assert_eq!(state.direction_of(1), Some(Direction::Descending));
        assert_eq!(state.direction_of(0), None);
        assert_eq!(SortState::Unset.direction_of(0), None);
    }

    #[test]
    fn test_table_id_parse() {
        assert_eq!("table-3".parse::<TableId>().unwrap(), TableId(3));
        assert_eq!("7".parse::<TableId>().unwrap(), TableId(7));
        assert!("table-x".parse::<TableId>().is_err());
        assert_eq!(TableId(4).to_string(), "table-4");
    }

    #[test]
    fn test_registry_lifecycle() {
        let mut registry = SortRegistry::new();
        assert!(registry.is_empty());

        assert_eq!(*registry.get_or_create(TableId(0)), SortState::Unset);
        *registry.get_or_create(TableId(0)) = SortState::Unset.activate(1);
        assert_eq!(
            registry.get(TableId(0)),
            Some(sorted(1, Direction::Ascending))
        );
        assert_eq!(registry.len(), 1);

        assert!(registry.remove(TableId(0)).is_some());
        assert!(registry.get(TableId(0)).is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_state_json_shape() {
        let json = serde_json::to_string(&sorted(2, Direction::Descending)).unwrap();
        assert_eq!(
            json,
            r#"{"state":"sorted","column":2,"direction":"descending"}"#
        );
        let id = serde_json::to_string(&TableId(1)).unwrap();
        assert_eq!(id, r#""table-1""#);
    }
}
