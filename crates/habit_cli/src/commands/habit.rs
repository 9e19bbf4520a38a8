use crate::common::{print_json, with_store, CliResult};
use clap::Args;
use habit_core::model::palette::{DEFAULT_COLOR, DEFAULT_TARGET_FREQUENCY};
use habit_core::{
    format_date, habit_completion_rate, parse_date, Clock, Habit, HabitDraft, HabitId,
    HabitPatch, MAX_WINDOW_DAYS,
};
use serde_json::{json, Value};
use std::path::Path;

#[derive(Args)]
pub struct AddArgs {
    /// Habit name
    name: String,
    #[arg(long, default_value = "")]
    description: String,
    #[arg(long, default_value = "")]
    category: String,
    #[arg(long, default_value = DEFAULT_COLOR)]
    color: String,
    /// Days per week (informational)
    #[arg(long, default_value_t = DEFAULT_TARGET_FREQUENCY, value_parser = clap::value_parser!(u8).range(1..=7))]
    target: u8,
}

#[derive(Args)]
pub struct ListArgs {
    /// Number of recent days to show per habit
    #[arg(long, default_value_t = 7, value_parser = clap::value_parser!(u64).range(1..=MAX_WINDOW_DAYS))]
    days: u64,
}

#[derive(Args)]
pub struct ToggleArgs {
    /// Habit id
    id: String,
    /// Day to toggle as YYYY-MM-DD (defaults to today)
    #[arg(long)]
    date: Option<String>,
}

#[derive(Args)]
pub struct EditArgs {
    /// Habit id
    id: String,
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    category: Option<String>,
    #[arg(long)]
    color: Option<String>,
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=7))]
    target: Option<u8>,
}

pub fn add(config: Option<&Path>, args: AddArgs) -> CliResult<()> {
    let draft = HabitDraft {
        name: args.name,
        description: args.description,
        category: args.category,
        color: args.color,
        target_frequency: args.target,
    };
    with_store(config, |store| {
        let id = store.create(draft)?;
        print_json(&json!({ "id": id }))
    })
}

pub fn list(config: Option<&Path>, args: ListArgs) -> CliResult<()> {
    with_store(config, |store| {
        let today = store.today();
        let now = store.clock().now();
        let items: Vec<Value> = store
            .habits()
            .iter()
            .map(|habit| habit_view(habit, today, now, args.days))
            .collect();
        print_json(&Value::Array(items))
    })
}

pub fn toggle(config: Option<&Path>, args: ToggleArgs) -> CliResult<()> {
    let date = args.date.as_deref().map(parse_date).transpose()?;
    let id = HabitId::from(args.id);
    with_store(config, |store| {
        let date = date.unwrap_or_else(|| store.today());
        let outcome = store
            .toggle_completion(&id, date)
            .ok_or_else(|| format!("habit not found: {id}"))?;
        print_json(&json!({
            "id": id,
            "date": format_date(date),
            "completed": outcome.completed,
            "currentStreak": outcome.streaks.current,
            "longestStreak": outcome.streaks.longest,
        }))
    })
}

pub fn edit(config: Option<&Path>, args: EditArgs) -> CliResult<()> {
    let patch = HabitPatch {
        name: args.name,
        description: args.description,
        category: args.category,
        color: args.color,
        target_frequency: args.target,
    };
    if patch.is_empty() {
        return Err("nothing to edit; pass at least one field flag".into());
    }
    let id = HabitId::from(args.id);
    with_store(config, |store| {
        if !store.update(&id, &patch)? {
            return Err(format!("habit not found: {id}").into());
        }
        print_json(&json!({ "id": id, "updated": true }))
    })
}

pub fn delete(config: Option<&Path>, id: &str) -> CliResult<()> {
    let id = HabitId::from(id);
    with_store(config, |store| {
        if !store.delete(&id) {
            return Err(format!("habit not found: {id}").into());
        }
        print_json(&json!({ "id": id, "deleted": true }))
    })
}

fn habit_view(
    habit: &Habit,
    today: chrono::NaiveDate,
    now: chrono::DateTime<chrono::Utc>,
    days: u64,
) -> Value {
    let recent: Vec<Value> = habit
        .recent_days(today, days)
        .into_iter()
        .map(|mark| json!({ "date": format_date(mark.date), "completed": mark.completed }))
        .collect();
    json!({
        "id": habit.id(),
        "name": habit.name,
        "description": habit.description,
        "category": habit.category,
        "color": habit.color,
        "targetFrequency": habit.target_frequency,
        "completedToday": habit.is_completed_on(today),
        "currentStreak": habit.current_streak(),
        "longestStreak": habit.longest_streak(),
        "completionRate": habit_completion_rate(habit, now),
        "recent": recent,
    })
}
