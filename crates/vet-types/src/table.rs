//! Table definitions and the SQL issued against them.

use std::fmt;

/// A column of a seeded table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub name: &'static str,
    /// MySQL column type used when creating the table.
    pub sql_type: &'static str,
}

const fn col(name: &'static str, sql_type: &'static str) -> Column {
    Column { name, sql_type }
}

const OWNER_COLUMNS: &[Column] = &[
    col("id", "CHAR(36)"),
    col("first_name", "VARCHAR(100)"),
    col("last_name", "VARCHAR(100)"),
    col("phone", "VARCHAR(50)"),
    col("email", "VARCHAR(255)"),
];

const PET_COLUMNS: &[Column] = &[
    col("id", "CHAR(36)"),
    col("owner_id", "CHAR(36)"),
    col("pet_name", "VARCHAR(100)"),
    col("species", "VARCHAR(50)"),
    col("breed", "VARCHAR(100)"),
    col("age", "INT"),
];

const VETERINARIAN_COLUMNS: &[Column] = &[
    col("id", "CHAR(36)"),
    col("first_name", "VARCHAR(100)"),
    col("last_name", "VARCHAR(100)"),
    col("phone", "VARCHAR(50)"),
    col("email", "VARCHAR(255)"),
    col("specialty", "VARCHAR(100)"),
];

const APPOINTMENT_COLUMNS: &[Column] = &[
    col("id", "CHAR(36)"),
    col("pet_id", "CHAR(36)"),
    col("veterinarian_id", "CHAR(36)"),
    col("appointment_date", "DATE"),
    col("status", "VARCHAR(50)"),
];

/// The tables populated by the seeder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Owners,
    Pets,
    Veterinarians,
    Appointments,
}

impl Table {
    /// All tables, ordered so that referenced tables come first.
    pub fn all() -> [Table; 4] {
        [
            Table::Owners,
            Table::Pets,
            Table::Veterinarians,
            Table::Appointments,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Table::Owners => "owners",
            Table::Pets => "pets",
            Table::Veterinarians => "veterinarians",
            Table::Appointments => "appointments",
        }
    }

    /// Columns in insert order. The primary key `id` is always first.
    pub fn columns(&self) -> &'static [Column] {
        match self {
            Table::Owners => OWNER_COLUMNS,
            Table::Pets => PET_COLUMNS,
            Table::Veterinarians => VETERINARIAN_COLUMNS,
            Table::Appointments => APPOINTMENT_COLUMNS,
        }
    }

    /// Position of `column` in this table's rows.
    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns().iter().position(|c| c.name == column)
    }

    /// Foreign keys as `(column, referenced table)` pairs.
    pub fn foreign_keys(&self) -> &'static [(&'static str, Table)] {
        match self {
            Table::Owners | Table::Veterinarians => &[],
            Table::Pets => &[("owner_id", Table::Owners)],
            Table::Appointments => &[
                ("pet_id", Table::Pets),
                ("veterinarian_id", Table::Veterinarians),
            ],
        }
    }

    /// Quoted, comma-separated column list.
    fn quoted_columns(&self) -> String {
        self.columns()
            .iter()
            .map(|c| format!("`{}`", c.name))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Multi-row parameterized INSERT with `rows` value tuples.
    pub fn bulk_insert_statement(&self, rows: usize) -> String {
        let row_template = self.row_placeholder();
        let rows_template: Vec<&str> = (0..rows).map(|_| row_template.as_str()).collect();
        format!(
            "INSERT INTO `{}` ({}) VALUES {}",
            self.name(),
            self.quoted_columns(),
            rows_template.join(", ")
        )
    }

    fn row_placeholder(&self) -> String {
        let placeholders: Vec<&str> = self.columns().iter().map(|_| "?").collect();
        format!("({})", placeholders.join(", "))
    }

    pub fn select_ids_statement(&self) -> String {
        format!("SELECT `id` FROM `{}`", self.name())
    }

    /// `CREATE TABLE IF NOT EXISTS` with primary and foreign keys.
    pub fn create_table_statement(&self) -> String {
        let mut defs: Vec<String> = self
            .columns()
            .iter()
            .map(|c| format!("`{}` {} NOT NULL", c.name, c.sql_type))
            .collect();

        defs.push("PRIMARY KEY (`id`)".to_string());

        for (column, referenced) in self.foreign_keys() {
            defs.push(format!(
                "FOREIGN KEY (`{column}`) REFERENCES `{}` (`id`)",
                referenced.name()
            ));
        }

        format!(
            "CREATE TABLE IF NOT EXISTS `{}` (\n  {}\n)",
            self.name(),
            defs.join(",\n  ")
        )
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
