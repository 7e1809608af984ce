pub type ResultRow = Vec<String>;

/// Header row followed by data rows, in discovery order.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultTable {
    rows: Vec<ResultRow>,
}

impl ResultTable {
    pub fn with_header(header: &[&str]) -> Self {
        Self {
            rows: vec![header.iter().map(|h| h.to_string()).collect()],
        }
    }

    pub fn push(&mut self, row: ResultRow) {
        self.rows.push(row);
    }

    pub fn header(&self) -> &[String] {
        &self.rows[0]
    }

    /// Data rows without the header.
    pub fn records(&self) -> &[ResultRow] {
        &self.rows[1..]
    }

    /// Every row, header first.
    pub fn rows(&self) -> &[ResultRow] {
        &self.rows
    }

    /// Row count including the header.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_starts_with_header() {
        let mut table = ResultTable::with_header(&["Status", "Count"]);
        assert_eq!(table.len(), 1);
        assert!(table.is_empty());

        table.push(vec!["Active".to_string(), "3".to_string()]);
        assert_eq!(table.header(), ["Status", "Count"]);
        assert_eq!(table.records().len(), 1);
        assert_eq!(table.rows()[1][0], "Active");
    }
}
