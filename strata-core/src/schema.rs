use crate::{Keyword, RawExpr, Value};
use serde::{Deserialize, Serialize};

/// Referential action for foreign key updates / deletes.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    /// No special action.
    #[default]
    NoAction,
    /// Reject the operation.
    Restrict,
    /// Propagate delete/update.
    Cascade,
    /// Set referencing columns to NULL.
    SetNull,
    /// Apply column DEFAULT.
    SetDefault,
}

impl Action {
    pub fn keyword(&self) -> Keyword {
        match self {
            Action::NoAction => Keyword::NoAction,
            Action::Restrict => Keyword::Restrict,
            Action::Cascade => Keyword::Cascade,
            Action::SetNull => Keyword::SetNull,
            Action::SetDefault => Keyword::SetDefault,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DefaultValue {
    /// Escaped through the dialect.
    Value(Value),
    /// Written verbatim, `CURRENT_TIMESTAMP` and the like.
    Custom(RawExpr),
}

/// Name given to a key a column takes part in, `Default` derives it from the column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyName {
    Default,
    Named(String),
}

impl KeyName {
    fn resolve(&self, column: &str) -> String {
        match self {
            KeyName::Default => column.to_string(),
            KeyName::Named(v) => v.clone(),
        }
    }
}

/// Column options, built fluently and handed to [`Schema::add_column`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub type_name: String,
    pub length: Option<String>,
    pub null: bool,
    pub default: Option<DefaultValue>,
    pub ai: bool,
    pub comment: Option<String>,
    pub charset: Option<String>,
    pub collate: Option<String>,
    pub unsigned: bool,
    pub zerofill: bool,
    pub primary: Option<KeyName>,
    pub unique: Option<KeyName>,
    pub index: Option<KeyName>,
    pub foreign: Option<ForeignKey>,
}

impl Column {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            length: None,
            null: true,
            default: None,
            ai: false,
            comment: None,
            charset: None,
            collate: None,
            unsigned: false,
            zerofill: false,
            primary: None,
            unique: None,
            index: None,
            foreign: None,
        }
    }

    /// Length or precision, `255` or `10,2`.
    pub fn length(mut self, length: impl ToString) -> Self {
        self.length = Some(length.to_string());
        self
    }

    pub fn null(mut self, null: bool) -> Self {
        self.null = null;
        self
    }

    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(DefaultValue::Value(value.into()));
        self
    }

    pub fn default_raw(mut self, value: impl Into<String>) -> Self {
        self.default = Some(DefaultValue::Custom(RawExpr::new(value)));
        self
    }

    pub fn ai(mut self, ai: bool) -> Self {
        self.ai = ai;
        self
    }

    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    pub fn charset(mut self, charset: impl Into<String>) -> Self {
        self.charset = Some(charset.into());
        self
    }

    pub fn collate(mut self, collate: impl Into<String>) -> Self {
        self.collate = Some(collate.into());
        self
    }

    pub fn unsigned(mut self, unsigned: bool) -> Self {
        self.unsigned = unsigned;
        self
    }

    pub fn zerofill(mut self, zerofill: bool) -> Self {
        self.zerofill = zerofill;
        self
    }

    pub fn primary(mut self) -> Self {
        self.primary = Some(KeyName::Default);
        self
    }

    pub fn primary_constraint(mut self, constraint: impl Into<String>) -> Self {
        self.primary = Some(KeyName::Named(constraint.into()));
        self
    }

    pub fn unique(mut self) -> Self {
        self.unique = Some(KeyName::Default);
        self
    }

    /// Columns sharing the same index name form a composite unique key.
    pub fn unique_index(mut self, index: impl Into<String>) -> Self {
        self.unique = Some(KeyName::Named(index.into()));
        self
    }

    pub fn index(mut self) -> Self {
        self.index = Some(KeyName::Default);
        self
    }

    /// Columns sharing the same group form a composite index.
    pub fn index_group(mut self, group: impl Into<String>) -> Self {
        self.index = Some(KeyName::Named(group.into()));
        self
    }

    pub fn foreign(mut self, foreign: ForeignKey) -> Self {
        self.foreign = Some(foreign);
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrimaryKey {
    pub constraint: Option<String>,
    pub columns: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UniqueKey {
    pub constraint: Option<String>,
    pub columns: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKey {
    /// `table.column`.
    pub references: String,
    pub constraint: Option<String>,
    pub on_update: Option<Action>,
    pub on_delete: Option<Action>,
}

impl ForeignKey {
    pub fn new(references: impl Into<String>) -> Self {
        Self {
            references: references.into(),
            constraint: None,
            on_update: None,
            on_delete: None,
        }
    }

    pub fn constraint(mut self, constraint: impl Into<String>) -> Self {
        self.constraint = Some(constraint.into());
        self
    }

    pub fn on_update(mut self, action: Action) -> Self {
        self.on_update = Some(action);
        self
    }

    pub fn on_delete(mut self, action: Action) -> Self {
        self.on_delete = Some(action);
        self
    }

    /// Referenced table and column.
    pub fn target(&self) -> Option<(&str, &str)> {
        self.references.rsplit_once('.')
    }
}

/// Table structure: columns, keys, indexes and options.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    table: String,
    columns: Vec<(String, Column)>,
    primary_key: Option<PrimaryKey>,
    unique_keys: Vec<(String, UniqueKey)>,
    foreign_keys: Vec<(String, ForeignKey)>,
    indexes: Vec<(String, Vec<String>)>,
    options: Vec<(String, String)>,
}

impl Schema {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            ..Default::default()
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// Adds (or replaces) a column and registers the keys it declares.
    ///
    /// Primary and auto increment columns are never nullable.
    pub fn add_column(&mut self, name: impl Into<String>, mut column: Column) -> &mut Self {
        let name = name.into();
        if column.primary.is_some() || column.ai {
            column.null = false;
        }
        if let Some(primary) = &column.primary {
            let constraint = match primary {
                KeyName::Named(v) => Some(v.as_str()),
                KeyName::Default => None,
            };
            self.add_primary(&name, constraint);
        }
        if let Some(unique) = &column.unique {
            self.add_unique(&name, Some(&unique.resolve(&name)), None);
        }
        if let Some(index) = &column.index {
            self.add_index(&name, Some(&index.resolve(&name)));
        }
        if let Some(foreign) = &column.foreign {
            self.add_foreign(&name, foreign.clone());
        }
        match self.columns.iter_mut().find(|v| v.0 == name) {
            Some(entry) => entry.1 = column,
            None => self.columns.push((name, column)),
        }
        self
    }

    pub fn add_columns<S: Into<String>>(
        &mut self,
        columns: impl IntoIterator<Item = (S, Column)>,
    ) -> &mut Self {
        for (name, column) in columns {
            self.add_column(name, column);
        }
        self
    }

    /// There is only one primary key, further calls append columns to it.
    pub fn add_primary(&mut self, column: &str, constraint: Option<&str>) -> &mut Self {
        let primary = self.primary_key.get_or_insert_with(Default::default);
        if primary.constraint.is_none() {
            primary.constraint = constraint.map(Into::into);
        }
        if !primary.columns.iter().any(|v| v == column) {
            primary.columns.push(column.into());
        }
        self
    }

    /// Columns registered under the same index name form one composite key.
    pub fn add_unique(
        &mut self,
        column: &str,
        index: Option<&str>,
        constraint: Option<&str>,
    ) -> &mut Self {
        let index = index.unwrap_or(column);
        let position = match self.unique_keys.iter().position(|v| v.0 == index) {
            Some(i) => i,
            None => {
                self.unique_keys.push((index.into(), UniqueKey::default()));
                self.unique_keys.len() - 1
            }
        };
        let key = &mut self.unique_keys[position].1;
        if key.constraint.is_none() {
            key.constraint = constraint.map(Into::into);
        }
        if !key.columns.iter().any(|v| v == column) {
            key.columns.push(column.into());
        }
        self
    }

    pub fn add_foreign(&mut self, column: &str, foreign: ForeignKey) -> &mut Self {
        match self.foreign_keys.iter_mut().find(|v| v.0 == column) {
            Some(entry) => entry.1 = foreign,
            None => self.foreign_keys.push((column.into(), foreign)),
        }
        self
    }

    pub fn add_index(&mut self, column: &str, group: Option<&str>) -> &mut Self {
        let group = group.unwrap_or(column);
        match self.indexes.iter_mut().find(|v| v.0 == group) {
            Some(entry) => {
                if !entry.1.iter().any(|v| v == column) {
                    entry.1.push(column.into());
                }
            }
            None => self.indexes.push((group.into(), vec![column.into()])),
        }
        self
    }

    pub fn add_option(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        let key = key.into();
        let value = value.into();
        match self.options.iter_mut().find(|v| v.0 == key) {
            Some(entry) => entry.1 = value,
            None => self.options.push((key, value)),
        }
        self
    }

    pub fn add_options<K: Into<String>, V: Into<String>>(
        &mut self,
        options: impl IntoIterator<Item = (K, V)>,
    ) -> &mut Self {
        for (key, value) in options {
            self.add_option(key, value);
        }
        self
    }

    pub fn columns(&self) -> &[(String, Column)] {
        &self.columns
    }

    /// Column lookup, a `table.` prefix is ignored.
    pub fn column(&self, name: &str) -> Option<&Column> {
        let name = name.rsplit_once('.').map(|v| v.1).unwrap_or(name);
        self.columns.iter().find(|v| v.0 == name).map(|v| &v.1)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    pub fn primary_key(&self) -> Option<&PrimaryKey> {
        self.primary_key.as_ref()
    }

    pub fn unique_keys(&self) -> &[(String, UniqueKey)] {
        &self.unique_keys
    }

    pub fn foreign_keys(&self) -> &[(String, ForeignKey)] {
        &self.foreign_keys
    }

    pub fn indexes(&self) -> &[(String, Vec<String>)] {
        &self.indexes
    }

    pub fn options(&self) -> &[(String, String)] {
        &self.options
    }
}
