//! CourseGraphBuilder for constructing the course graph from CSV exports.
//!
//! The builder reads schedule rows (one per section) and, optionally,
//! catalog rows carrying long descriptions:
//!
//! 1. Phase 1 adds a course node per distinct course code and a professor
//!    node per named instructor, registering each in the index
//! 2. Phase 2 adds `taught_by` edges, `prerequisite` edges parsed from the
//!    description text, and `covers_topic` edges for topic keywords found
//!    in titles and descriptions
//! 3. Phase 3 loads optional manual edges from JSON
//!
//! Edges are only added once every node exists, so a prerequisite that
//! appears later in the file still links. Edges naming an unknown course
//! are recorded in `BuildStats::dangling_refs` rather than dropped
//! silently.

use crate::config::DEFAULT_TOPIC_KEYWORDS;
use crate::resolver::contains_ci;
use crate::{DEFAULT_EDGE_WEIGHT, EdgeType, KnowledgeGraph, NodeAttributes, NodeType};
use coursekg_core::util::ids::extract_course_codes;
use coursekg_core::{Error, Result, course_node_id, normalize_course_code, professor_node_id, topic_node_id};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

static VALID_CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]{2,4} \d{4}$").expect("Invalid course code regex"));

static PREREQUISITE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)prerequisites?").expect("Invalid prerequisite regex"));

/// Instructor placeholders that do not name a person.
const PLACEHOLDER_INSTRUCTORS: [&str; 2] = ["tba", "staff"];

// ============================================================================
// Builder configuration types
// ============================================================================

/// Options for handling malformed rows during graph building.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ErrorHandling {
    /// Stop on the first malformed row.
    FailFast,
    /// Skip malformed rows and record them in `BuildStats::skipped_rows`.
    #[default]
    Collect,
    /// Skip malformed rows with a warning; only the counter is kept.
    Skip,
}

/// A row that could not be ingested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildError {
    /// Which input the row came from ("schedule" or "catalog").
    pub source: &'static str,
    /// 1-based record number, header excluded.
    pub record: usize,
    /// Error message.
    pub message: String,
}

/// Manual edge definition loaded from JSON.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ManualEdge {
    /// Source node ID.
    pub source: String,
    /// Target node ID.
    pub target: String,
    /// Edge type name.
    #[serde(rename = "type")]
    pub edge_type: String,
    /// Optional weight override.
    pub weight: Option<f64>,
}

/// Statistics from a graph build operation.
#[derive(Debug, Clone, Default)]
pub struct BuildStats {
    /// Number of nodes created.
    pub nodes_created: usize,
    /// Number of edges created (manual edges excluded).
    pub edges_created: usize,
    /// Schedule rows ingested.
    pub rows_processed: usize,
    /// Schedule and catalog rows skipped as malformed.
    pub rows_skipped: usize,
    /// Detail for skipped rows (`ErrorHandling::Collect` only).
    pub skipped_rows: Vec<BuildError>,
    /// Manual edges loaded.
    pub manual_edges_loaded: usize,
    /// Dangling references (edges to/from missing nodes).
    pub dangling_refs: Vec<String>,
    /// Duplicate edges that were deduplicated.
    pub deduped_edges: usize,
}

// ============================================================================
// CSV rows
// ============================================================================

#[derive(Debug, Deserialize)]
struct ScheduleRow {
    course_code: String,
    #[serde(default)]
    subject: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    instructor: String,
    #[serde(default)]
    building_room: String,
    #[serde(default)]
    day_time: String,
    #[serde(default)]
    credits: String,
    #[serde(default)]
    status: String,
    #[serde(default)]
    crn: String,
    #[serde(default)]
    section: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CatalogRow {
    course_code: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    subject: Option<String>,
}

#[derive(Debug, Clone)]
enum Source {
    Path(PathBuf),
    Text(String),
}

impl Source {
    fn open(&self) -> Result<Box<dyn Read + '_>> {
        match self {
            Source::Path(path) => {
                let file = std::fs::File::open(path).map_err(|e| Error::io_with_path(e, path))?;
                Ok(Box::new(file))
            }
            Source::Text(text) => Ok(Box::new(text.as_bytes())),
        }
    }
}

fn csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader)
}

fn non_empty(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

// ============================================================================
// CourseGraphBuilder
// ============================================================================

/// Builder for constructing a `KnowledgeGraph` from schedule and catalog CSV.
///
/// # Example
///
/// ```rust
/// use coursekg_graph::CourseGraphBuilder;
///
/// let schedule = "subject,course_code,title,instructor,building_room,day_time,credits,status,crn,description\n\
///                 CSCI,CSCI 1010,Intro,\"Goldfrank, J\",SEH 1300,MW 10:00,3,OPEN,10001,\n\
///                 CSCI,CSCI 1012,Programming,TBA,SEH 1400,TR 11:00,3,OPEN,10002,Prerequisite: CSCI 1010.\n";
///
/// let (kg, stats) = CourseGraphBuilder::new()
///     .with_schedule_csv(schedule)
///     .build()
///     .unwrap();
///
/// assert_eq!(stats.rows_processed, 2);
/// assert_eq!(kg.index.course("CSCI 1012"), Some("course_CSCI1012"));
/// assert!(kg.graph.has_edge(
///     "course_CSCI1010",
///     "course_CSCI1012",
///     &coursekg_graph::EdgeType::Prerequisite
/// ));
/// ```
#[derive(Debug, Clone)]
pub struct CourseGraphBuilder {
    schedule: Option<Source>,
    catalog: Option<Source>,
    manual_edges_path: Option<PathBuf>,
    topic_keywords: Vec<String>,
    error_handling: ErrorHandling,
}

impl Default for CourseGraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CourseGraphBuilder {
    /// Creates a builder with the default topic keywords.
    pub fn new() -> Self {
        Self {
            schedule: None,
            catalog: None,
            manual_edges_path: None,
            topic_keywords: DEFAULT_TOPIC_KEYWORDS.iter().map(|k| k.to_string()).collect(),
            error_handling: ErrorHandling::default(),
        }
    }

    /// Reads schedule rows from a CSV file.
    pub fn with_schedule_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.schedule = Some(Source::Path(path.into()));
        self
    }

    /// Reads schedule rows from CSV text.
    pub fn with_schedule_csv(mut self, csv: impl Into<String>) -> Self {
        self.schedule = Some(Source::Text(csv.into()));
        self
    }

    /// Reads catalog descriptions from a CSV file.
    pub fn with_catalog_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.catalog = Some(Source::Path(path.into()));
        self
    }

    /// Reads catalog descriptions from CSV text.
    pub fn with_catalog_csv(mut self, csv: impl Into<String>) -> Self {
        self.catalog = Some(Source::Text(csv.into()));
        self
    }

    /// Adds manual edges from a JSON file.
    pub fn with_manual_edges(mut self, path: impl Into<PathBuf>) -> Self {
        self.manual_edges_path = Some(path.into());
        self
    }

    /// Replaces the topic keywords matched against titles and descriptions.
    pub fn with_topic_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.topic_keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the error handling strategy.
    pub fn with_error_handling(mut self, handling: ErrorHandling) -> Self {
        self.error_handling = handling;
        self
    }

    /// Builds the graph and its index.
    pub fn build(self) -> Result<(KnowledgeGraph, BuildStats)> {
        let schedule = self.schedule.as_ref().ok_or_else(|| {
            Error::config("Schedule not set. Use with_schedule_path() or with_schedule_csv() first.")
        })?;

        let mut stats = BuildStats::default();
        let catalog = match &self.catalog {
            Some(source) => self.read_catalog(source, &mut stats)?,
            None => HashMap::new(),
        };

        let mut kg = KnowledgeGraph::default();
        let mut teaching: Vec<(String, String)> = Vec::new();

        // ================================================================
        // Phase 1: Course and professor nodes
        // ================================================================
        let reader = csv_reader(schedule.open()?);
        for (i, record) in reader.into_deserialize::<ScheduleRow>().enumerate() {
            let record_no = i + 1;
            let outcome = record
                .map_err(|e| Error::parse(format!("schedule record {record_no}: {e}")))
                .and_then(|row| {
                    add_schedule_row(&mut kg, &catalog, &row, record_no, &mut teaching, &mut stats)
                });
            match outcome {
                Ok(()) => stats.rows_processed += 1,
                Err(e) => self.handle_row_error(&mut stats, "schedule", record_no, e)?,
            }
        }

        // ================================================================
        // Phase 2: Derived edges
        // ================================================================
        for (course_id, prof_id) in &teaching {
            link(&mut kg, &mut stats, course_id, prof_id, EdgeType::TaughtBy);
        }

        let courses: Vec<(String, String)> = kg
            .graph
            .iter_nodes()
            .filter(|n| n.node_type == NodeType::Course)
            .map(|n| {
                let title = n.attributes.title.clone().unwrap_or_default();
                let description = n.attributes.description.clone().unwrap_or_default();
                (n.id.clone(), format!("{title} {description}"))
            })
            .collect();

        for (course_id, text) in &courses {
            for code in parse_prerequisites(text) {
                let prereq_id = course_node_id(&code);
                if &prereq_id != course_id {
                    link(&mut kg, &mut stats, &prereq_id, course_id, EdgeType::Prerequisite);
                }
            }
        }

        for (course_id, text) in &courses {
            for keyword in &self.topic_keywords {
                let label = keyword.trim().to_lowercase();
                if label.is_empty() || !contains_ci(text, &label) {
                    continue;
                }
                let topic_id = topic_node_id(&label);
                let attributes = NodeAttributes::new().with_name(label.clone());
                if kg.graph.add_node(NodeType::Topic, &topic_id, attributes) {
                    stats.nodes_created += 1;
                    kg.index.register_topic(&kg.graph, &label, &topic_id);
                }
                link(&mut kg, &mut stats, course_id, &topic_id, EdgeType::CoversTopic);
            }
        }

        // ================================================================
        // Phase 3: Manual edges
        // ================================================================
        if let Some(ref manual_path) = self.manual_edges_path {
            stats.manual_edges_loaded = load_manual_edges(manual_path, &mut kg, &mut stats)?;
        }

        log::info!(
            "Built course graph: {} nodes, {} edges ({} rows, {} skipped, {} dangling)",
            kg.graph.number_of_nodes(),
            kg.graph.number_of_edges(),
            stats.rows_processed,
            stats.rows_skipped,
            stats.dangling_refs.len()
        );

        Ok((kg, stats))
    }

    fn read_catalog(
        &self,
        source: &Source,
        stats: &mut BuildStats,
    ) -> Result<HashMap<String, CatalogRow>> {
        let mut catalog = HashMap::new();
        let reader = csv_reader(source.open()?);
        for (i, record) in reader.into_deserialize::<CatalogRow>().enumerate() {
            let record_no = i + 1;
            let outcome = record
                .map_err(|e| Error::parse(format!("catalog record {record_no}: {e}")))
                .and_then(|row| {
                    let code = normalize_course_code(&row.course_code);
                    if VALID_CODE_RE.is_match(&code) {
                        Ok((code, row))
                    } else {
                        Err(Error::parse(format!(
                            "catalog record {record_no}: invalid course code {:?}",
                            row.course_code
                        )))
                    }
                });
            match outcome {
                Ok((code, row)) => {
                    catalog.entry(code).or_insert(row);
                }
                Err(e) => self.handle_row_error(stats, "catalog", record_no, e)?,
            }
        }
        Ok(catalog)
    }

    fn handle_row_error(
        &self,
        stats: &mut BuildStats,
        source: &'static str,
        record: usize,
        error: Error,
    ) -> Result<()> {
        match self.error_handling {
            ErrorHandling::FailFast => Err(error),
            ErrorHandling::Collect => {
                stats.rows_skipped += 1;
                stats.skipped_rows.push(BuildError {
                    source,
                    record,
                    message: error.to_string(),
                });
                Ok(())
            }
            ErrorHandling::Skip => {
                log::warn!("Skipping {source} record {record}: {error}");
                stats.rows_skipped += 1;
                Ok(())
            }
        }
    }
}

// ============================================================================
// Helper functions
// ============================================================================

fn add_schedule_row(
    kg: &mut KnowledgeGraph,
    catalog: &HashMap<String, CatalogRow>,
    row: &ScheduleRow,
    record_no: usize,
    teaching: &mut Vec<(String, String)>,
    stats: &mut BuildStats,
) -> Result<()> {
    let code = normalize_course_code(&row.course_code);
    if !VALID_CODE_RE.is_match(&code) {
        return Err(Error::parse(format!(
            "schedule record {record_no}: invalid course code {:?}",
            row.course_code
        )));
    }

    let course_id = course_node_id(&code);
    let entry = catalog.get(&code);
    let attributes = course_attributes(&code, row, entry);

    if kg.graph.add_node(NodeType::Course, &course_id, attributes.clone()) {
        stats.nodes_created += 1;
        kg.index.register_course(&kg.graph, &code, &course_id);
    } else {
        kg.graph.merge_attributes(&course_id, &attributes);
    }

    for name in split_instructors(&row.instructor) {
        let prof_id = professor_node_id(name);
        let attributes = NodeAttributes::new().with_name(name);
        if kg.graph.add_node(NodeType::Professor, &prof_id, attributes) {
            stats.nodes_created += 1;
            kg.index.register_professor(&kg.graph, name, &prof_id);
        }
        teaching.push((course_id.clone(), prof_id));
    }

    Ok(())
}

fn course_attributes(code: &str, row: &ScheduleRow, entry: Option<&CatalogRow>) -> NodeAttributes {
    let mut attributes = NodeAttributes::new().with_code(code);

    let title = non_empty(&row.title).or_else(|| entry.and_then(|c| c.title.as_deref().and_then(non_empty)));
    if let Some(title) = title {
        attributes = attributes.with_title(title);
    }

    let description = row
        .description
        .as_deref()
        .and_then(non_empty)
        .or_else(|| entry.and_then(|c| c.description.as_deref().and_then(non_empty)));
    if let Some(description) = description {
        attributes = attributes.with_description(description);
    }

    let subject = non_empty(&row.subject).or_else(|| entry.and_then(|c| c.subject.as_deref().and_then(non_empty)));
    if let Some(subject) = subject {
        attributes = attributes.with_extra("subject", subject);
    }

    let columns = [
        ("credits", row.credits.as_str()),
        ("crn", row.crn.as_str()),
        ("status", row.status.as_str()),
        ("building_room", row.building_room.as_str()),
        ("day_time", row.day_time.as_str()),
        ("section", row.section.as_deref().unwrap_or_default()),
    ];
    for (key, value) in columns {
        if let Some(value) = non_empty(value) {
            attributes = attributes.with_extra(key, value);
        }
    }

    attributes
}

/// Instructor names in a cell, with placeholders (`TBA`, `Staff`) removed.
fn split_instructors(cell: &str) -> impl Iterator<Item = &str> {
    cell.split(';').map(str::trim).filter(|name| {
        !name.is_empty() && !PLACEHOLDER_INSTRUCTORS.contains(&name.to_lowercase().as_str())
    })
}

/// Course codes mentioned after the first "Prerequisite(s)" in `text`.
fn parse_prerequisites(text: &str) -> Vec<String> {
    match PREREQUISITE_RE.find(text) {
        Some(m) => extract_course_codes(&text[m.end()..]),
        None => Vec::new(),
    }
}

/// Add an edge, recording dangling and duplicate attempts.
fn link(kg: &mut KnowledgeGraph, stats: &mut BuildStats, source: &str, target: &str, edge_type: EdgeType) {
    if !kg.graph.has_node(source) || !kg.graph.has_node(target) {
        log::warn!("Dangling reference: {source} -[{edge_type}]-> {target}");
        stats
            .dangling_refs
            .push(format!("{source} -[{}]-> {target}", edge_type.name()));
        return;
    }
    if kg.graph.has_edge(source, target, &edge_type) {
        stats.deduped_edges += 1;
        return;
    }
    if kg.graph.add_edge(source, target, edge_type, DEFAULT_EDGE_WEIGHT) {
        stats.edges_created += 1;
    }
}

/// Load manual edges from a JSON file.
fn load_manual_edges(path: &Path, kg: &mut KnowledgeGraph, stats: &mut BuildStats) -> Result<usize> {
    if !path.exists() {
        return Ok(0);
    }

    let json = std::fs::read_to_string(path).map_err(|e| Error::io_with_path(e, path))?;

    let manual_edges: Vec<ManualEdge> = serde_json::from_str(&json)
        .map_err(|e| Error::parse(format!("Failed to parse manual edges: {e}")))?;

    let mut loaded = 0;
    for manual in manual_edges {
        if !kg.graph.has_node(&manual.source) || !kg.graph.has_node(&manual.target) {
            stats.dangling_refs.push(format!(
                "manual: {} -[{}]-> {}",
                manual.source, manual.edge_type, manual.target
            ));
            continue;
        }

        let edge_type = EdgeType::parse_lenient(&manual.edge_type);
        if kg.graph.has_edge(&manual.source, &manual.target, &edge_type) {
            stats.deduped_edges += 1;
            continue;
        }

        let weight = manual.weight.unwrap_or(DEFAULT_EDGE_WEIGHT);
        if kg.graph.add_edge(&manual.source, &manual.target, edge_type, weight) {
            loaded += 1;
        }
    }

    Ok(loaded)
}

// ============================================================================
// Tests
// ============================================================================
