//! # Engine tasks
//!
//! A task document tells the engine what to do with one expression:
//!
//! ```text
//! expression
//!   postfix: xx*
//!   compose_with: xs
//!   operator: +
//! bindings
//!   s: 0.5
//! operations
//!   derivative: x
//!   simplify: true
//!   evaluate: true
//!   substitute: false
//!   wrap: sin
//! sampling
//!   variable: x
//!   start: 0.0
//!   end: 1.0
//!   points: 11
//!   csv: samples.csv
//! logging
//!   level: info
//!   file: task.log
//! ```
//!
//! `logging.file: auto` picks a timestamped `log_<date>_<time>.txt` name.
//!
//! Only `expression.postfix` is required. Postfix values are written without spaces.
//! The pipeline applied by [`EngineTask::run`] is fixed:
//! build, compose, substitute, wrap, derivative, simplify, evaluate, sample.
//! Every step is optional except the first one.

use crate::Utils::logger::{parse_level, save_samples_to_csv};
use crate::Utils::task_parser::{DocumentMap, Value, parse_document_as};
use crate::symbolic::expr_tree::ExprTree;
use crate::symbolic::symbolic_engine::{Symbol, UnaryFunc};
use crate::symbolic::symbolic_errors::{ComposeError, DerivError, EvalError, ParseError};
use crate::symbolic::utils::linspace;
use log::{LevelFilter, info, warn};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use tabled::{builder::Builder, settings::Style};

#[derive(Debug, Clone, PartialEq)]
pub enum TaskError {
    /// the document is not a sequence of `title key: values` sections
    Document(String),
    MissingField { section: String, key: String },
    InvalidField { section: String, key: String, value: String },
    Parse(ParseError),
    Eval(EvalError),
    Deriv(DerivError),
    Compose(ComposeError),
    /// file access or CSV output
    Io(String),
}

impl fmt::Display for TaskError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TaskError::Document(msg) => write!(f, "Task document error: {}", msg),
            TaskError::MissingField { section, key } => {
                write!(f, "Missing field '{}' in section '{}'", key, section)
            }
            TaskError::InvalidField {
                section,
                key,
                value,
            } => write!(
                f,
                "Invalid value '{}' for field '{}' in section '{}'",
                value, key, section
            ),
            TaskError::Parse(e) => write!(f, "Parse error: {}", e),
            TaskError::Eval(e) => write!(f, "Evaluation error: {}", e),
            TaskError::Deriv(e) => write!(f, "Derivative error: {}", e),
            TaskError::Compose(e) => write!(f, "Compose error: {}", e),
            TaskError::Io(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl std::error::Error for TaskError {}

impl From<ParseError> for TaskError {
    fn from(e: ParseError) -> Self {
        TaskError::Parse(e)
    }
}

impl From<EvalError> for TaskError {
    fn from(e: EvalError) -> Self {
        TaskError::Eval(e)
    }
}

impl From<DerivError> for TaskError {
    fn from(e: DerivError) -> Self {
        TaskError::Deriv(e)
    }
}

impl From<ComposeError> for TaskError {
    fn from(e: ComposeError) -> Self {
        TaskError::Compose(e)
    }
}

impl From<std::io::Error> for TaskError {
    fn from(e: std::io::Error) -> Self {
        TaskError::Io(e.to_string())
    }
}

impl From<csv::Error> for TaskError {
    fn from(e: csv::Error) -> Self {
        TaskError::Io(e.to_string())
    }
}

/// Values of the expression on an evenly spaced grid of one variable.
#[derive(Debug, Clone, PartialEq)]
pub struct Sampling {
    pub variable: char,
    pub start: f64,
    pub end: f64,
    pub points: usize,
    pub csv: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EngineTask {
    pub postfix: String,
    /// second operand and operator of an optional composition
    pub compose_with: Option<(String, char)>,
    pub bindings: HashMap<char, f64>,
    pub substitute: bool,
    pub wrap: Option<UnaryFunc>,
    pub derivative: Option<char>,
    pub simplify: bool,
    pub evaluate: bool,
    pub sampling: Option<Sampling>,
    pub log_level: LevelFilter,
    pub log_file: Option<String>,
}

impl Default for EngineTask {
    fn default() -> Self {
        EngineTask {
            postfix: String::new(),
            compose_with: None,
            bindings: HashMap::new(),
            substitute: false,
            wrap: None,
            derivative: None,
            simplify: false,
            evaluate: false,
            sampling: None,
            log_level: LevelFilter::Info,
            log_file: None,
        }
    }
}

/// Read access to one section of a parsed document.
struct Section<'a> {
    name: &'a str,
    fields: Option<&'a HashMap<String, Option<Vec<Value>>>>,
}

impl<'a> Section<'a> {
    fn new(document: &'a DocumentMap, name: &'a str) -> Self {
        Section {
            name,
            fields: document.get(name),
        }
    }

    /// true if the document gives at least one key of this section a value
    fn is_given(&self) -> bool {
        self.fields
            .is_some_and(|fields| fields.values().any(Option::is_some))
    }

    fn first(&self, key: &str) -> Option<&'a Value> {
        self.fields?.get(key)?.as_ref()?.first()
    }

    fn invalid(&self, key: &str, value: &Value) -> TaskError {
        TaskError::InvalidField {
            section: self.name.to_string(),
            key: key.to_string(),
            value: value.to_string_value(),
        }
    }

    fn required(&self, key: &str) -> Result<&'a Value, TaskError> {
        self.first(key).ok_or_else(|| TaskError::MissingField {
            section: self.name.to_string(),
            key: key.to_string(),
        })
    }

    fn text(&self, key: &str) -> Option<String> {
        self.first(key).map(Value::to_string_value)
    }

    fn flag(&self, key: &str) -> Result<bool, TaskError> {
        match self.first(key) {
            None => Ok(false),
            Some(value) => value.as_boolean().ok_or_else(|| self.invalid(key, value)),
        }
    }

    fn number(&self, key: &str) -> Result<f64, TaskError> {
        let value = self.required(key)?;
        value.as_float().ok_or_else(|| self.invalid(key, value))
    }

    fn letter(&self, key: &str, value: &Value) -> Result<char, TaskError> {
        let text = value.to_string_value();
        let mut chars = text.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(c),
            _ => Err(self.invalid(key, value)),
        }
    }
}

/// Sections and keys a task document may contain. `bindings` takes any variable name.
pub fn task_template() -> DocumentMap {
    let sections: [(&str, &[&str]); 5] = [
        ("expression", &["postfix", "compose_with", "operator"]),
        ("bindings", &[]),
        (
            "operations",
            &["derivative", "simplify", "evaluate", "substitute", "wrap"],
        ),
        ("sampling", &["variable", "start", "end", "points", "csv"]),
        ("logging", &["level", "file"]),
    ];
    sections
        .iter()
        .map(|(title, keys)| {
            let fields = keys.iter().map(|key| (key.to_string(), None)).collect();
            (title.to_string(), fields)
        })
        .collect()
}

impl EngineTask {
    /// Parses and validates a task document. Every key of [`task_template`] is
    /// present afterwards, keys the document does not set hold `None`.
    pub fn from_document(input: &str) -> Result<EngineTask, TaskError> {
        let template = task_template();
        let document = parse_document_as(input, Some(&template)).map_err(TaskError::Document)?;
        for (title, fields) in &document {
            match template.get(title) {
                None => warn!("unknown section '{}' is ignored", title),
                Some(known) if title != "bindings" => {
                    for key in fields.keys().filter(|key| !known.contains_key(*key)) {
                        warn!("unknown key '{}' in section '{}' is ignored", key, title);
                    }
                }
                Some(_) => {}
            }
        }

        let expression = Section::new(&document, "expression");
        let postfix = expression.required("postfix")?.to_string_value();
        let compose_with = match expression.text("compose_with") {
            Some(other) => {
                let op = match expression.first("operator") {
                    Some(value) => expression.letter("operator", value)?,
                    None => '+',
                };
                Some((other, op))
            }
            None => None,
        };

        let mut bindings = HashMap::new();
        if let Some(fields) = document.get("bindings") {
            let section = Section::new(&document, "bindings");
            for (key, values) in fields {
                let Some(value) = values.as_ref().and_then(|v| v.first()) else {
                    return Err(TaskError::MissingField {
                        section: "bindings".to_string(),
                        key: key.clone(),
                    });
                };
                let name = match key.chars().next() {
                    Some(c) if key.len() == 1 && Symbol::new(c).is_some() => c,
                    _ => return Err(section.invalid(key, value)),
                };
                let number = value.as_float().ok_or_else(|| section.invalid(key, value))?;
                bindings.insert(name, number);
            }
        }

        let operations = Section::new(&document, "operations");
        let derivative = match operations.first("derivative") {
            Some(value) => Some(operations.letter("derivative", value)?),
            None => None,
        };
        let wrap = match operations.first("wrap") {
            Some(value) => Some(
                UnaryFunc::from_str(&value.to_string_value())
                    .map_err(|_| operations.invalid("wrap", value))?,
            ),
            None => None,
        };

        let sampling_section = Section::new(&document, "sampling");
        let sampling = if sampling_section.is_given() {
            let variable_value = sampling_section.required("variable")?;
            let variable = sampling_section.letter("variable", variable_value)?;
            let points_value = sampling_section.required("points")?;
            let points = points_value
                .as_integer()
                .filter(|n| *n > 0)
                .ok_or_else(|| sampling_section.invalid("points", points_value))?;
            Some(Sampling {
                variable,
                start: sampling_section.number("start")?,
                end: sampling_section.number("end")?,
                points: points as usize,
                csv: sampling_section.text("csv"),
            })
        } else {
            None
        };

        let logging = Section::new(&document, "logging");
        let log_level = match logging.first("level") {
            Some(value) => {
                parse_level(&value.to_string_value()).ok_or_else(|| logging.invalid("level", value))?
            }
            None => LevelFilter::Info,
        };

        Ok(EngineTask {
            postfix,
            compose_with,
            bindings,
            substitute: operations.flag("substitute")?,
            wrap,
            derivative,
            simplify: operations.flag("simplify")?,
            evaluate: operations.flag("evaluate")?,
            sampling,
            log_level,
            log_file: logging.text("file"),
        })
    }

    /// Runs the pipeline. The first failing step aborts the task with its error.
    pub fn run(&self) -> Result<TaskReport, TaskError> {
        let mut report = TaskReport::default();
        let mut tree = ExprTree::build_from_postfix(&self.postfix)?;
        report.push_step("input", &tree);

        if let Some((other, op)) = &self.compose_with {
            let rhs = ExprTree::build_from_postfix(other)?;
            tree = ExprTree::compose(&tree, &rhs, *op)?;
            report.push_step(&format!("compose {}", op), &tree);
        }
        if self.substitute {
            tree = tree.substitute_bound_variables(&self.bindings);
            report.push_step("substitute", &tree);
        }
        if let Some(func) = self.wrap {
            // the root is never outside the tree
            if let Some(wrapped) = tree.wrap_subtree(&[], func) {
                tree = wrapped;
                report.push_step(&format!("wrap {}", func), &tree);
            }
        }
        if let Some(var) = self.derivative {
            tree = tree.derivative(var)?;
            report.push_step(&format!("d/d{}", var), &tree);
        }
        if self.simplify {
            tree = tree.simplify();
            report.push_step("simplify", &tree);
        }
        if self.evaluate {
            let value = tree.evaluate(&self.bindings)?;
            info!("{} = {}", tree, value);
            report.value = Some(value);
        }
        if let Some(sampling) = &self.sampling {
            report.samples = sample(&tree, &self.bindings, sampling)?;
            if let Some(csv) = &sampling.csv {
                let headers = vec![sampling.variable.to_string(), "value".to_string()];
                let rows: Vec<Vec<f64>> =
                    report.samples.iter().map(|(x, y)| vec![*x, *y]).collect();
                save_samples_to_csv(csv, &headers, &rows)?;
                info!("{} samples saved to {}", rows.len(), csv);
            }
        }
        report.result = tree;
        Ok(report)
    }
}

fn sample(
    tree: &ExprTree,
    bindings: &HashMap<char, f64>,
    sampling: &Sampling,
) -> Result<Vec<(f64, f64)>, EvalError> {
    let mut bindings = bindings.clone();
    linspace(sampling.start, sampling.end, sampling.points)
        .into_iter()
        .map(|x| {
            bindings.insert(sampling.variable, x);
            tree.evaluate(&bindings).map(|y| (x, y))
        })
        .collect()
}

/// What a task produced: the tree after every step, the final tree, and the numbers.
#[derive(Debug, Clone, Default)]
pub struct TaskReport {
    /// (step, infix, postfix)
    pub steps: Vec<(String, String, String)>,
    pub result: ExprTree,
    pub value: Option<f64>,
    pub samples: Vec<(f64, f64)>,
}

impl TaskReport {
    fn push_step(&mut self, step: &str, tree: &ExprTree) {
        self.steps
            .push((step.to_string(), tree.to_infix(), tree.postfix_raw().to_string()));
    }

    pub fn steps_table(&self) -> String {
        let mut builder = Builder::default();
        builder.push_record(["step", "infix", "postfix"]);
        for (step, infix, postfix) in &self.steps {
            builder.push_record([step.as_str(), infix.as_str(), postfix.as_str()]);
        }
        let mut table = builder.build();
        table.with(Style::modern_rounded());
        table.to_string()
    }

    pub fn samples_table(&self, variable: char) -> String {
        let mut builder = Builder::default();
        builder.push_record([variable.to_string(), "value".to_string()]);
        for (x, y) in &self.samples {
            builder.push_record([x.to_string(), y.to_string()]);
        }
        let mut table = builder.build();
        table.with(Style::modern_rounded());
        table.to_string()
    }
}

impl fmt::Display for TaskReport {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}", self.steps_table())?;
        if let Some(value) = self.value {
            writeln!(f, "value = {}", value)?;
        }
        Ok(())
    }
}
