//! Data models for nerfdash.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Media kind of the captured input data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    #[default]
    Image,
    Video,
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MediaKind::Image => write!(f, "image"),
            MediaKind::Video => write!(f, "video"),
        }
    }
}

/// The closed vocabulary of numeric metric fields eligible for
/// aggregation, sorting and display. Nothing outside this set is ever
/// aggregated; `MetricKey::parse` is the single validation point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MetricKey {
    #[serde(rename = "psnr")]
    Psnr,
    #[serde(rename = "psnr_std")]
    PsnrStd,
    #[serde(rename = "ssim")]
    Ssim,
    #[serde(rename = "ssim_std")]
    SsimStd,
    #[serde(rename = "lpips")]
    Lpips,
    #[serde(rename = "lpips_std")]
    LpipsStd,
    // Wire name spelled as the upstream API spells it.
    #[serde(rename = "preprocesing_time_s")]
    PreprocessingTime,
    #[serde(rename = "training_time_s")]
    TrainingTime,
    #[serde(rename = "evaluation_time_s")]
    EvaluationTime,
    #[serde(rename = "num_rays_per_sec")]
    RaysPerSec,
    #[serde(rename = "num_rays_per_sec_std")]
    RaysPerSecStd,
    #[serde(rename = "fps")]
    Fps,
    #[serde(rename = "fps_std")]
    FpsStd,
    #[serde(rename = "frames_quantity")]
    FramesQuantity,
    #[serde(rename = "frame_size_total_bytes")]
    FrameSizeTotal,
    #[serde(rename = "frame_size_avg_bytes")]
    FrameSizeAvg,
}

impl MetricKey {
    /// Every metric, in canonical column order.
    pub const ALL: [MetricKey; 16] = [
        MetricKey::Psnr,
        MetricKey::PsnrStd,
        MetricKey::Ssim,
        MetricKey::SsimStd,
        MetricKey::Lpips,
        MetricKey::LpipsStd,
        MetricKey::PreprocessingTime,
        MetricKey::TrainingTime,
        MetricKey::EvaluationTime,
        MetricKey::RaysPerSec,
        MetricKey::RaysPerSecStd,
        MetricKey::Fps,
        MetricKey::FpsStd,
        MetricKey::FramesQuantity,
        MetricKey::FrameSizeTotal,
        MetricKey::FrameSizeAvg,
    ];

    /// Wire/column name of the metric.
    pub fn as_str(self) -> &'static str {
        match self {
            MetricKey::Psnr => "psnr",
            MetricKey::PsnrStd => "psnr_std",
            MetricKey::Ssim => "ssim",
            MetricKey::SsimStd => "ssim_std",
            MetricKey::Lpips => "lpips",
            MetricKey::LpipsStd => "lpips_std",
            MetricKey::PreprocessingTime => "preprocesing_time_s",
            MetricKey::TrainingTime => "training_time_s",
            MetricKey::EvaluationTime => "evaluation_time_s",
            MetricKey::RaysPerSec => "num_rays_per_sec",
            MetricKey::RaysPerSecStd => "num_rays_per_sec_std",
            MetricKey::Fps => "fps",
            MetricKey::FpsStd => "fps_std",
            MetricKey::FramesQuantity => "frames_quantity",
            MetricKey::FrameSizeTotal => "frame_size_total_bytes",
            MetricKey::FrameSizeAvg => "frame_size_avg_bytes",
        }
    }

    /// Total validation: `None` for anything outside the vocabulary.
    pub fn parse(name: &str) -> Option<MetricKey> {
        MetricKey::ALL.into_iter().find(|k| k.as_str() == name)
    }

    /// Human label for table headers and chart axes.
    pub fn label(self) -> &'static str {
        match self {
            MetricKey::Psnr => "PSNR",
            MetricKey::PsnrStd => "PSNR (std)",
            MetricKey::Ssim => "SSIM",
            MetricKey::SsimStd => "SSIM (std)",
            MetricKey::Lpips => "LPIPS",
            MetricKey::LpipsStd => "LPIPS (std)",
            MetricKey::PreprocessingTime => "Preprocessing time (s)",
            MetricKey::TrainingTime => "Training time (s)",
            MetricKey::EvaluationTime => "Evaluation time (s)",
            MetricKey::RaysPerSec => "Rays/s",
            MetricKey::RaysPerSecStd => "Rays/s (std)",
            MetricKey::Fps => "FPS",
            MetricKey::FpsStd => "FPS (std)",
            MetricKey::FramesQuantity => "Frames",
            MetricKey::FrameSizeTotal => "Total frame size",
            MetricKey::FrameSizeAvg => "Avg frame size",
        }
    }

    /// Byte-count metrics get size formatting and always compare numerically.
    pub fn is_byte_size(self) -> bool {
        matches!(self, MetricKey::FrameSizeTotal | MetricKey::FrameSizeAvg)
    }
}

impl std::fmt::Display for MetricKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The closed vocabulary of boolean category flags: two scene kinds and
/// three object kinds. Declaration order is the canonical tag order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CategoryKey {
    #[serde(rename = "open_scene")]
    OpenScene,
    #[serde(rename = "closed_scene")]
    ClosedScene,
    #[serde(rename = "opaque_obj")]
    OpaqueObj,
    #[serde(rename = "transparent_obj")]
    TransparentObj,
    #[serde(rename = "complex_obj")]
    ComplexObj,
}

impl CategoryKey {
    pub const ALL: [CategoryKey; 5] = [
        CategoryKey::OpenScene,
        CategoryKey::ClosedScene,
        CategoryKey::OpaqueObj,
        CategoryKey::TransparentObj,
        CategoryKey::ComplexObj,
    ];

    /// Scene sub-vocabulary, in tag order.
    pub const SCENE: [CategoryKey; 2] = [CategoryKey::OpenScene, CategoryKey::ClosedScene];

    /// Object sub-vocabulary, in tag order.
    pub const OBJECT: [CategoryKey; 3] = [
        CategoryKey::OpaqueObj,
        CategoryKey::TransparentObj,
        CategoryKey::ComplexObj,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            CategoryKey::OpenScene => "open_scene",
            CategoryKey::ClosedScene => "closed_scene",
            CategoryKey::OpaqueObj => "opaque_obj",
            CategoryKey::TransparentObj => "transparent_obj",
            CategoryKey::ComplexObj => "complex_obj",
        }
    }

    pub fn parse(name: &str) -> Option<CategoryKey> {
        CategoryKey::ALL.into_iter().find(|k| k.as_str() == name)
    }

    pub fn label(self) -> &'static str {
        match self {
            CategoryKey::OpenScene => "Open scene",
            CategoryKey::ClosedScene => "Closed scene",
            CategoryKey::OpaqueObj => "Opaque object",
            CategoryKey::TransparentObj => "Transparent object",
            CategoryKey::ComplexObj => "Complex object",
        }
    }
}

impl std::fmt::Display for CategoryKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The numeric metric fields, flattened into the record wire shape.
/// Absent values stay absent; `get` is the total accessor the engines use.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub psnr: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub psnr_std: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssim: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssim_std: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lpips: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lpips_std: Option<f64>,
    #[serde(
        default,
        rename = "preprocesing_time_s",
        skip_serializing_if = "Option::is_none"
    )]
    pub preprocessing_time_s: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub training_time_s: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evaluation_time_s: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_rays_per_sec: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_rays_per_sec_std: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fps: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fps_std: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frames_quantity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame_size_total_bytes: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame_size_avg_bytes: Option<f64>,
}

impl Metrics {
    pub fn get(&self, key: MetricKey) -> Option<f64> {
        match key {
            MetricKey::Psnr => self.psnr,
            MetricKey::PsnrStd => self.psnr_std,
            MetricKey::Ssim => self.ssim,
            MetricKey::SsimStd => self.ssim_std,
            MetricKey::Lpips => self.lpips,
            MetricKey::LpipsStd => self.lpips_std,
            MetricKey::PreprocessingTime => self.preprocessing_time_s,
            MetricKey::TrainingTime => self.training_time_s,
            MetricKey::EvaluationTime => self.evaluation_time_s,
            MetricKey::RaysPerSec => self.num_rays_per_sec,
            MetricKey::RaysPerSecStd => self.num_rays_per_sec_std,
            MetricKey::Fps => self.fps,
            MetricKey::FpsStd => self.fps_std,
            MetricKey::FramesQuantity => self.frames_quantity,
            MetricKey::FrameSizeTotal => self.frame_size_total_bytes,
            MetricKey::FrameSizeAvg => self.frame_size_avg_bytes,
        }
    }

    pub fn set(&mut self, key: MetricKey, value: Option<f64>) {
        match key {
            MetricKey::Psnr => self.psnr = value,
            MetricKey::PsnrStd => self.psnr_std = value,
            MetricKey::Ssim => self.ssim = value,
            MetricKey::SsimStd => self.ssim_std = value,
            MetricKey::Lpips => self.lpips = value,
            MetricKey::LpipsStd => self.lpips_std = value,
            MetricKey::PreprocessingTime => self.preprocessing_time_s = value,
            MetricKey::TrainingTime => self.training_time_s = value,
            MetricKey::EvaluationTime => self.evaluation_time_s = value,
            MetricKey::RaysPerSec => self.num_rays_per_sec = value,
            MetricKey::RaysPerSecStd => self.num_rays_per_sec_std = value,
            MetricKey::Fps => self.fps = value,
            MetricKey::FpsStd => self.fps_std = value,
            MetricKey::FramesQuantity => self.frames_quantity = value,
            MetricKey::FrameSizeTotal => self.frame_size_total_bytes = value,
            MetricKey::FrameSizeAvg => self.frame_size_avg_bytes = value,
        }
    }
}

/// The five boolean category flags, flattened into the record wire shape.
/// Missing flags deserialize to false (absent means not tagged).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryFlags {
    #[serde(default)]
    pub open_scene: bool,
    #[serde(default)]
    pub closed_scene: bool,
    #[serde(default)]
    pub opaque_obj: bool,
    #[serde(default)]
    pub transparent_obj: bool,
    #[serde(default)]
    pub complex_obj: bool,
}

impl CategoryFlags {
    pub fn get(&self, key: CategoryKey) -> bool {
        match key {
            CategoryKey::OpenScene => self.open_scene,
            CategoryKey::ClosedScene => self.closed_scene,
            CategoryKey::OpaqueObj => self.opaque_obj,
            CategoryKey::TransparentObj => self.transparent_obj,
            CategoryKey::ComplexObj => self.complex_obj,
        }
    }

    pub fn set(&mut self, key: CategoryKey, value: bool) {
        match key {
            CategoryKey::OpenScene => self.open_scene = value,
            CategoryKey::ClosedScene => self.closed_scene = value,
            CategoryKey::OpaqueObj => self.opaque_obj = value,
            CategoryKey::TransparentObj => self.transparent_obj = value,
            CategoryKey::ComplexObj => self.complex_obj = value,
        }
    }
}

/// A raw experiment record as the REST endpoint delivers it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentRecord {
    pub id: u64,
    pub title: String,
    pub dataset: String,
    #[serde(rename = "type")]
    pub kind: MediaKind,
    pub model: String,
    pub preprocessor: String,
    #[serde(default)]
    pub scene_type: String,
    #[serde(default)]
    pub virtual_scene: bool,
    #[serde(default)]
    pub real_scene: bool,
    pub date_added: DateTime<Utc>,
    pub date_updated: DateTime<Utc>,
    #[serde(flatten)]
    pub metrics: Metrics,
    #[serde(flatten)]
    pub categories: CategoryFlags,
    #[serde(default)]
    pub preprocessed: bool,
    #[serde(default)]
    pub trained: bool,
    #[serde(default)]
    pub evaluated: bool,
    #[serde(default)]
    pub successful: bool,
    #[serde(default)]
    pub error: String,
    #[serde(default)]
    pub raw_data: serde_json::Value,
}

/// A record shaped for the table views: category flags collapsed into the
/// two tag lists, book-keeping fields stripped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableRecord {
    pub id: u64,
    pub title: String,
    pub dataset: String,
    #[serde(rename = "type")]
    pub kind: MediaKind,
    pub model: String,
    pub preprocessor: String,
    pub scene_type: String,
    pub virtual_scene: bool,
    pub real_scene: bool,
    pub date_added: DateTime<Utc>,
    pub date_updated: DateTime<Utc>,
    #[serde(flatten)]
    pub metrics: Metrics,
    pub tag_obj: Vec<CategoryKey>,
    pub tag_esc: Vec<CategoryKey>,
}

/// A table column: every scalar of [`TableRecord`], the two tag lists, and
/// each metric. The single vocabulary behind grouping, sorting, and column
/// selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Id,
    Title,
    Dataset,
    Kind,
    Model,
    Preprocessor,
    SceneType,
    VirtualScene,
    RealScene,
    DateAdded,
    DateUpdated,
    TagObj,
    TagEsc,
    Metric(MetricKey),
}

/// A borrowed view of one column of one record, used for grouping keys and
/// sort comparisons.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    Int(u64),
    Text(&'a str),
    Bool(bool),
    Time(DateTime<Utc>),
    Num(Option<f64>),
    Tags(&'a [CategoryKey]),
}

impl Field {
    const BASE: [Field; 13] = [
        Field::Id,
        Field::Title,
        Field::Dataset,
        Field::Kind,
        Field::Model,
        Field::Preprocessor,
        Field::SceneType,
        Field::VirtualScene,
        Field::RealScene,
        Field::DateAdded,
        Field::DateUpdated,
        Field::TagObj,
        Field::TagEsc,
    ];

    /// Every column in canonical order: scalars, tags, then the metric
    /// vocabulary.
    pub fn all() -> impl Iterator<Item = Field> {
        Field::BASE
            .into_iter()
            .chain(MetricKey::ALL.into_iter().map(Field::Metric))
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Field::Id => "id",
            Field::Title => "title",
            Field::Dataset => "dataset",
            Field::Kind => "type",
            Field::Model => "model",
            Field::Preprocessor => "preprocessor",
            Field::SceneType => "scene_type",
            Field::VirtualScene => "virtual_scene",
            Field::RealScene => "real_scene",
            Field::DateAdded => "date_added",
            Field::DateUpdated => "date_updated",
            Field::TagObj => "tag_obj",
            Field::TagEsc => "tag_esc",
            Field::Metric(m) => m.as_str(),
        }
    }

    /// Total validation over the column vocabulary.
    pub fn parse(name: &str) -> Option<Field> {
        Field::all().find(|f| f.as_str() == name)
    }

    pub fn label(self) -> &'static str {
        match self {
            Field::Id => "ID",
            Field::Title => "Title",
            Field::Dataset => "Dataset",
            Field::Kind => "Type",
            Field::Model => "Model",
            Field::Preprocessor => "Preprocessor",
            Field::SceneType => "Scene type",
            Field::VirtualScene => "Virtual scene",
            Field::RealScene => "Real scene",
            Field::DateAdded => "Added",
            Field::DateUpdated => "Updated",
            Field::TagObj => "Object tags",
            Field::TagEsc => "Scene tags",
            Field::Metric(m) => m.label(),
        }
    }

    pub fn is_tag(self) -> bool {
        matches!(self, Field::TagObj | Field::TagEsc)
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TableRecord {
    /// Column accessor behind grouping and sorting.
    pub fn value_of(&self, field: Field) -> FieldValue<'_> {
        match field {
            Field::Id => FieldValue::Int(self.id),
            Field::Title => FieldValue::Text(&self.title),
            Field::Dataset => FieldValue::Text(&self.dataset),
            Field::Kind => FieldValue::Text(match self.kind {
                MediaKind::Image => "image",
                MediaKind::Video => "video",
            }),
            Field::Model => FieldValue::Text(&self.model),
            Field::Preprocessor => FieldValue::Text(&self.preprocessor),
            Field::SceneType => FieldValue::Text(&self.scene_type),
            Field::VirtualScene => FieldValue::Bool(self.virtual_scene),
            Field::RealScene => FieldValue::Bool(self.real_scene),
            Field::DateAdded => FieldValue::Time(self.date_added),
            Field::DateUpdated => FieldValue::Time(self.date_updated),
            Field::TagObj => FieldValue::Tags(&self.tag_obj),
            Field::TagEsc => FieldValue::Tags(&self.tag_esc),
            Field::Metric(m) => FieldValue::Num(self.metrics.get(m)),
        }
    }

    /// String form of a column, as used for scalar group keys. Tag lists
    /// join their names with a comma.
    pub fn key_of(&self, field: Field) -> String {
        match self.value_of(field) {
            FieldValue::Int(v) => v.to_string(),
            FieldValue::Text(v) => v.to_string(),
            FieldValue::Bool(v) => v.to_string(),
            FieldValue::Time(v) => v.to_rfc3339(),
            FieldValue::Num(v) => match v {
                Some(n) => n.to_string(),
                None => String::new(),
            },
            FieldValue::Tags(tags) => tags
                .iter()
                .map(|t| t.as_str())
                .collect::<Vec<_>>()
                .join(", "),
        }
    }
}
