use crate::metamodel::{Entity, Multiplicity};
use tabled::{settings::Style, Table, Tabled};

#[derive(Tabled)]
pub struct TableRow {
    #[tabled(rename = "Metric")]
    pub metric: String,
    #[tabled(rename = "Value")]
    pub value: String,
}

#[derive(Default)]
pub struct TableBuilder {
    rows: Vec<TableRow>,
}

impl TableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_row(&mut self, label: &str, value: &str) {
        self.rows.push(TableRow {
            metric: label.to_string(),
            value: value.to_string(),
        });
    }

    pub fn build(&self) -> String {
        if self.rows.is_empty() {
            return String::new();
        }
        Table::new(&self.rows).with(Style::rounded()).to_string()
    }
}

#[derive(Tabled)]
pub struct EntityRow {
    #[tabled(rename = "Entity")]
    pub name: String,
    #[tabled(rename = "Properties")]
    pub properties: String,
    #[tabled(rename = "Relations")]
    pub relations: String,
}

impl EntityRow {
    pub fn from_entity(entity: &Entity) -> Self {
        Self {
            name: entity.name().to_string(),
            properties: features(entity.properties().iter().map(|p| (p.name(), p.multiplicity()))),
            relations: features(entity.relations().iter().map(|r| (r.name(), r.multiplicity()))),
        }
    }
}

/// `name` for single features, `name*` for multiple ones
fn features<'e>(iter: impl Iterator<Item = (&'e str, Multiplicity)>) -> String {
    iter.map(|(name, multiplicity)| match multiplicity {
        Multiplicity::Single => name.to_string(),
        Multiplicity::Multiple => format!("{}*", name),
    })
    .collect::<Vec<_>>()
    .join(", ")
}

pub fn entity_table<'e>(entities: impl IntoIterator<Item = &'e Entity>) -> String {
    let rows: Vec<_> = entities.into_iter().map(EntityRow::from_entity).collect();
    if rows.is_empty() {
        return String::new();
    }
    Table::new(&rows).with(Style::rounded()).to_string()
}

pub fn stats_table(stats: &[(&str, &str)]) -> String {
    let mut builder = TableBuilder::new();
    for (label, value) in stats {
        builder.add_row(label, value);
    }
    builder.build()
}
