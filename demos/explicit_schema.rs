//! An entity that lists its own column descriptors, with a composite key
//! and a column named differently from its attribute.
//!
//! Run with `cargo run -p rowbind-demos --example explicit_schema`.

use rowbind_core::{Entity, FieldDescriptor, Predicate, Result, SchemaSource, Value, convert};
use rowbind_sqlite::{DatabaseConfig, Table, table_info};

#[derive(Debug, Default)]
struct Score {
    player: i64,
    round: i64,
    points: u64,
}

impl Entity for Score {
    fn table_name() -> &'static str {
        "scores"
    }

    fn schema_source() -> SchemaSource {
        SchemaSource::Explicit(vec![
            FieldDescriptor::int("player_id").with_id("player").primary_key(true),
            FieldDescriptor::int("round").primary_key(true),
            FieldDescriptor::uint64("points"),
        ])
    }

    fn get(&self, id: &str) -> Option<Value> {
        match id {
            "player" => Some(Value::Int(self.player)),
            "round" => Some(Value::Int(self.round)),
            "points" => Some(Value::Uint64(self.points)),
            _ => None,
        }
    }

    fn set(&mut self, id: &str, value: Value) -> Result<()> {
        match id {
            "player" => self.player = convert(id, &value)?,
            "round" => self.round = convert(id, &value)?,
            "points" => self.points = convert(id, &value)?,
            _ => {}
        }
        Ok(())
    }
}

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let conn = DatabaseConfig::default().open()?;
    let scores = Table::<Score>::new(&conn)?;
    scores.create(false)?;

    for (player, round, points) in [(1, 1, 10), (1, 2, 7), (2, 1, 12)] {
        scores.insert(&Score { player, round, points })?;
    }
    scores.update(&Score { player: 1, round: 2, points: 9 })?;

    for column in table_info(&conn, scores.name())? {
        println!("{} {} pk={}", column.name, column.type_name, column.primary_key);
    }

    let player_one = scores
        .filter([Predicate::eq("player", 1)])
        .order_by(["round"])
        .all()?;
    for score in &player_one {
        println!("player {} round {}: {}", score.player, score.round, score.points);
    }

    Ok(())
}
