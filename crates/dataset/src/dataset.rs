//! Dataset: named tables plus the relations between them.

use crate::relation::{ColumnRef, Relation};
use std::collections::BTreeMap;
use tabula_core::{Error, Result};
use tabula_table::{Row, Table};
use tracing::debug;

/// A named collection of tables and relations.
///
/// Relations refer to columns by table and column name, so `Clone` yields a
/// dataset whose relations resolve against its own cloned tables.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Dataset {
    name: String,
    /// Table name → table.
    tables: BTreeMap<String, Table>,
    /// Relations in declaration order.
    relations: Vec<Relation>,
}

impl Dataset {
    /// Creates an empty dataset.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tables: BTreeMap::new(),
            relations: Vec::new(),
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Adds a table under its own name.
    pub fn add_table(&mut self, table: Table) -> Result<&mut Table> {
        let name = table.name().to_string();
        if self.tables.contains_key(&name) {
            return Err(Error::duplicate_table(name));
        }
        debug!(dataset = %self.name, table = %name, "table added");
        Ok(self.tables.entry(name).or_insert(table))
    }

    /// Removes a table and every relation that involves it. Unknown names
    /// are a no-op returning `None`.
    pub fn remove_table(&mut self, name: &str) -> Option<Table> {
        let table = self.tables.remove(name)?;
        let dataset = &self.name;
        self.relations.retain(|relation| {
            let keep = !relation.involves(name);
            if !keep {
                debug!(dataset = %dataset, relation = %relation.name(), "relation removed by table cascade");
            }
            keep
        });
        debug!(dataset = %self.name, table = %name, "table removed");
        Some(table)
    }

    /// Gets a table by name.
    pub fn table(&self, name: &str) -> Result<&Table> {
        self.tables.get(name).ok_or_else(|| Error::table_not_found(name))
    }

    /// Gets a mutable table by name.
    pub fn table_mut(&mut self, name: &str) -> Result<&mut Table> {
        self.tables
            .get_mut(name)
            .ok_or_else(|| Error::table_not_found(name))
    }

    pub fn contains_table(&self, name: &str) -> bool {
        self.tables.contains_key(name)
    }

    /// Iterates over tables in name order.
    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.tables.values()
    }

    /// Returns all table names.
    pub fn table_names(&self) -> Vec<&str> {
        self.tables.keys().map(|s| s.as_str()).collect()
    }

    pub fn table_count(&self) -> usize {
        self.tables.len()
    }

    /// Declares a relation between two columns named by table and column.
    pub fn relate(
        &mut self,
        name: &str,
        parent_table: &str,
        parent_column: &str,
        child_table: &str,
        child_column: &str,
    ) -> Result<&Relation> {
        self.add_relation(Relation::between(
            name,
            ColumnRef::new(parent_table, parent_column),
            ColumnRef::new(child_table, child_column),
        ))
    }

    /// Adds a relation. Both ends must resolve to existing columns of tables
    /// in this dataset.
    pub fn add_relation(&mut self, relation: Relation) -> Result<&Relation> {
        if self.relations.iter().any(|r| r.name() == relation.name()) {
            return Err(Error::duplicate_relation(relation.name()));
        }
        self.resolve(relation.parent())?;
        self.resolve(relation.child())?;

        debug!(
            dataset = %self.name,
            relation = %relation.name(),
            parent = %relation.parent(),
            child = %relation.child(),
            "relation added"
        );
        self.relations.push(relation);
        let last = self.relations.len() - 1;
        Ok(&self.relations[last])
    }

    /// Removes a relation. Unknown names are a no-op returning `None`.
    pub fn remove_relation(&mut self, name: &str) -> Option<Relation> {
        let index = self.relations.iter().position(|r| r.name() == name)?;
        debug!(dataset = %self.name, relation = %name, "relation removed");
        Some(self.relations.remove(index))
    }

    /// Gets a relation by name.
    pub fn relation(&self, name: &str) -> Result<&Relation> {
        self.relations
            .iter()
            .find(|r| r.name() == name)
            .ok_or_else(|| Error::relation_not_found(name))
    }

    /// Returns every relation in declaration order.
    pub fn relations(&self) -> &[Relation] {
        &self.relations
    }

    /// Relations in which `table` is the child.
    pub fn parent_relations(&self, table: &str) -> Vec<&Relation> {
        self.relations
            .iter()
            .filter(|r| r.child_table() == table)
            .collect()
    }

    /// Relations in which `table` is the parent.
    pub fn child_relations(&self, table: &str) -> Vec<&Relation> {
        self.relations
            .iter()
            .filter(|r| r.parent_table() == table)
            .collect()
    }

    /// Returns the child-table rows whose relation column equals the parent
    /// row's relation column, in child-table order.
    pub fn get_child_rows(&self, parent_row: &Row, relation: &str) -> Result<Vec<&Row>> {
        let relation = self.relation(relation)?;
        let key = parent_row.get(relation.parent_column())?;
        let child = self.table(relation.child_table())?;
        Ok(child
            .rows()
            .filter(|row| row.get(relation.child_column()).map_or(false, |v| v == key)))
    }

    /// Returns the first parent-table row matching the child row's relation
    /// column.
    pub fn get_parent_row(&self, child_row: &Row, relation: &str) -> Result<Option<&Row>> {
        let relation = self.relation(relation)?;
        let key = child_row.get(relation.child_column())?;
        let parent = self.table(relation.parent_table())?;
        Ok(parent
            .rows()
            .find(|row| row.get(relation.parent_column()).map_or(false, |v| v == key)))
    }

    /// Removes every row of every table; columns and relations stay.
    pub fn clear(&mut self) {
        for table in self.tables.values_mut() {
            table.clear();
        }
    }

    pub fn accept_changes(&mut self) {
        for table in self.tables.values_mut() {
            table.accept_changes();
        }
    }

    pub fn reject_changes(&mut self) {
        for table in self.tables.values_mut() {
            table.reject_changes();
        }
    }

    fn resolve(&self, column: &ColumnRef) -> Result<()> {
        self.table(&column.table)?.column(&column.column)?;
        Ok(())
    }
}
