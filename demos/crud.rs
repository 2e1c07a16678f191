//! Create, update, query, and delete rows of an annotated entity.
//!
//! Run with `cargo run -p rowbind-demos --example crud`.

use chrono::NaiveDate;
use rowbind_core::{Operator, Predicate};
use rowbind_sqlite::{DatabaseConfig, Table, UpsertOutcome};

rowbind_core::entity! {
    #[derive(Debug, Clone, Default)]
    pub struct Task {
        pub id: i64 => [name = "id", primary_key = "true"],
        pub title: String => [name = "title", length = "60", null = "false"],
        pub done: bool => [name = "done"],
        pub estimate: f32 => [name = "estimate"],
        pub due: chrono::NaiveDateTime => [name = "due"],
        pub scratch: Option<String> => [],
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let conn = DatabaseConfig::default().open()?;
    let tasks = Table::<Task>::new(&conn)?;
    tasks.create(true)?;

    let due = NaiveDate::from_ymd_opt(2026, 1, 15)
        .and_then(|d| d.and_hms_opt(9, 0, 0))
        .ok_or("invalid date")?;
    for id in 1..=5 {
        tasks.insert(&Task {
            id,
            title: format!("task {id}"),
            done: id % 2 == 0,
            estimate: id as f32 * 1.5,
            due,
            scratch: None,
        })?;
    }

    let mut first = tasks.query().filter([Predicate::eq("id", 1)]).first()?.ok_or("task 1 missing")?;
    first.done = true;
    tasks.update(&first)?;

    let outcome = tasks.upsert(&Task {
        id: 6,
        title: "task 6".to_string(),
        due,
        ..Task::default()
    })?;
    assert_eq!(outcome, UpsertOutcome::Inserted);

    let open = tasks
        .query()
        .filter([Predicate::eq("done", false)])
        .order_by(["-estimate"])
        .all()?;
    println!("open tasks:");
    for task in &open {
        println!("  #{} {} ({}h, due {})", task.id, task.title, task.estimate, task.due);
    }

    let big = tasks
        .filter([Predicate::new("estimate", Operator::Gt, 4.0_f32)])
        .all()?;
    for task in &big {
        tasks.delete(task)?;
    }
    println!("deleted {} large tasks, {} left", big.len(), tasks.all()?.len());

    Ok(())
}
