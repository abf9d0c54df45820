//! Select Form Example
//!
//! Builds a small form out of three select fields:
//! - Scalar options with a placeholder
//! - Tuple options with a disabled entry
//! - A live collection of models
//!
//! Changes are driven through the document the way a user would, and the
//! form prints every value its fields report.

use std::fs::File;
use std::sync::{Arc, Mutex};

use log::LevelFilter;
use selectview::prelude::*;
use simplelog::{Config, WriteLogger};

// ============================================================================
// Form
// ============================================================================

#[derive(Default)]
struct Form {
    fields: Mutex<Vec<SelectView>>,
}

impl Form {
    fn add(&self, field: SelectView) {
        self.fields
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .push(field);
    }

    fn is_valid(&self) -> bool {
        self.fields
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .iter()
            .all(SelectView::is_valid)
    }

    fn submit(&self) -> selectview::Result<()> {
        let fields = self
            .fields
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .clone();
        for field in &fields {
            field.before_submit()?;
        }
        for field in &fields {
            println!("  {} = {}", field.name(), field.value());
        }
        Ok(())
    }
}

impl FieldParent for Form {
    fn update(&self, field: &SelectView) {
        println!(
            "{} -> {} ({})",
            field.name(),
            field.value(),
            if field.is_valid() { "valid" } else { "invalid" }
        );
    }
}

// ============================================================================
// Main
// ============================================================================

fn run() -> selectview::Result<()> {
    let doc = Document::new();
    let form = Arc::new(Form::default());
    let root = doc.create(hookdom::Element::div().class("form"));

    let mount = |view: &SelectView| -> selectview::Result<()> {
        if let Some(el) = view.el() {
            doc.append_child(root, el)?;
        }
        Ok(())
    };

    let fruit = SelectView::new(
        &doc,
        SelectConfig::new("fruit", OptionSource::scalars(["apple", "banana", "cherry"]))
            .label("Fruit")
            .unselected_text("Choose a fruit")
            .required(true)
            .parent(&form)
            .auto_render(true),
    )?;
    mount(&fruit)?;
    form.add(fruit.clone());

    let priority = SelectView::new(
        &doc,
        SelectConfig::new(
            "priority",
            OptionSource::tuples([(1, "Low", false), (2, "Medium", false), (3, "Urgent", true)]),
        )
        .label("Priority")
        .value(2)
        .parent(&form)
        .auto_render(true),
    )?;
    mount(&priority)?;
    form.add(priority.clone());

    let people = Collection::new([
        Model::new().set("id", 7).set("name", "Ada"),
        Model::new().set("id", 8).set("name", "Grace"),
    ]);
    let owner = SelectView::new(
        &doc,
        SelectConfig::new("owner", people.clone())
            .label("Owner")
            .text_attribute("name")
            .yield_model(false)
            .parent(&form)
            .auto_render(true),
    )?;
    mount(&owner)?;
    form.add(owner.clone());

    println!("form valid: {}", form.is_valid());

    // Pick the second fruit as a user would
    if let Some(select) = fruit.select_el() {
        doc.choose(select, 2)?;
    }

    people.add(Model::new().set("id", 9).set("name", "Linus"));
    owner.set_value(9)?;
    people.remove(9);

    if let Err(err) = priority.set_value(5) {
        println!("rejected: {err}");
    }

    println!("form valid: {}", form.is_valid());
    println!("submitting:");
    form.submit()?;

    priority.reset()?;
    owner.remove()?;
    println!("form holds {} field(s)", doc.children(root).len());
    Ok(())
}

fn main() {
    // Initialize file logging
    if let Ok(log_file) = File::create("form.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, Config::default(), log_file);
    }

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
    }
}
