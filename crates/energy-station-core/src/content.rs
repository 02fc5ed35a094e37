//! Built-in practice content and the route table that dispatches it.
//!
//! Every practice item is one [`ContentItem`] variant. Navigation resolves a
//! `content_id` through [`ContentKind::route_for`], the single place where a
//! kind maps to a screen.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::session::Phase;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Meditation,
    Breathing,
    Mindfulness,
    WhiteNoise,
}

impl ContentKind {
    pub const ALL: [ContentKind; 4] = [
        ContentKind::Meditation,
        ContentKind::Breathing,
        ContentKind::Mindfulness,
        ContentKind::WhiteNoise,
    ];

    /// Screen path for this kind.
    pub fn route(self) -> &'static str {
        match self {
            ContentKind::Meditation => "/p-meditation_detail",
            ContentKind::Breathing => "/p-breathing_detail",
            ContentKind::Mindfulness => "/p-mindfulness_detail",
            ContentKind::WhiteNoise => "/p-white_noise_detail",
        }
    }

    pub fn route_for(self, content_id: &str) -> String {
        format!("{}?content_id={}", self.route(), content_id)
    }

    /// Id shown when a screen is opened with an unknown or missing id.
    pub fn default_id(self) -> &'static str {
        match self {
            ContentKind::Meditation => "meditation_001",
            ContentKind::Breathing => "breathing_001",
            ContentKind::Mindfulness => "mindfulness_001",
            ContentKind::WhiteNoise => "rain",
        }
    }

    /// Infer the kind from an id such as `breathing_002` or `ocean`.
    pub fn from_content_id(id: &str) -> Option<Self> {
        if id.starts_with("meditation_") {
            Some(ContentKind::Meditation)
        } else if id.starts_with("breathing_") {
            Some(ContentKind::Breathing)
        } else if id.starts_with("mindfulness_") {
            Some(ContentKind::Mindfulness)
        } else if id.starts_with("whitenoise_") || WHITE_NOISE_IDS.contains(&id) {
            Some(ContentKind::WhiteNoise)
        } else {
            None
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ContentKind::Meditation => "meditation",
            ContentKind::Breathing => "breathing",
            ContentKind::Mindfulness => "mindfulness",
            ContentKind::WhiteNoise => "whitenoise",
        }
    }
}

impl std::str::FromStr for ContentKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        ContentKind::ALL
            .into_iter()
            .find(|k| k.label() == s || (s == "white_noise" && *k == ContentKind::WhiteNoise))
            .ok_or_else(|| {
                CoreError::Validation(crate::error::ValidationError::invalid(
                    "kind",
                    format!("unknown content kind '{s}'"),
                ))
            })
    }
}

const WHITE_NOISE_IDS: [&str; 6] = ["rain", "ocean", "forest", "wind", "cafe", "white"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeditationCourse {
    pub id: String,
    pub title: String,
    pub description: String,
    pub duration_min: u32,
    pub level: String,
    pub category: String,
    pub instructor: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreathingExercise {
    pub id: String,
    pub title: String,
    pub description: String,
    pub phases: Vec<Phase>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MindfulnessGuide {
    pub id: String,
    pub title: String,
    pub description: String,
    pub author: String,
    pub audio_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WhiteNoiseTrack {
    pub id: String,
    pub title: String,
    pub description: String,
    pub icon: String,
}

/// One practice item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ContentItem {
    Meditation(MeditationCourse),
    Breathing(BreathingExercise),
    Mindfulness(MindfulnessGuide),
    WhiteNoise(WhiteNoiseTrack),
}

impl ContentItem {
    pub fn kind(&self) -> ContentKind {
        match self {
            ContentItem::Meditation(_) => ContentKind::Meditation,
            ContentItem::Breathing(_) => ContentKind::Breathing,
            ContentItem::Mindfulness(_) => ContentKind::Mindfulness,
            ContentItem::WhiteNoise(_) => ContentKind::WhiteNoise,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            ContentItem::Meditation(c) => &c.id,
            ContentItem::Breathing(c) => &c.id,
            ContentItem::Mindfulness(c) => &c.id,
            ContentItem::WhiteNoise(c) => &c.id,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            ContentItem::Meditation(c) => &c.title,
            ContentItem::Breathing(c) => &c.title,
            ContentItem::Mindfulness(c) => &c.title,
            ContentItem::WhiteNoise(c) => &c.title,
        }
    }

    pub fn description(&self) -> &str {
        match self {
            ContentItem::Meditation(c) => &c.description,
            ContentItem::Breathing(c) => &c.description,
            ContentItem::Mindfulness(c) => &c.description,
            ContentItem::WhiteNoise(c) => &c.description,
        }
    }

    pub fn route(&self) -> String {
        self.kind().route_for(self.id())
    }
}

/// Lookup table over every built-in item.
#[derive(Debug, Clone)]
pub struct Catalog {
    items: Vec<ContentItem>,
}

impl Catalog {
    pub fn new(items: Vec<ContentItem>) -> Self {
        Self { items }
    }

    pub fn builtin() -> Self {
        let mut items = Vec::new();
        items.extend(meditations().into_iter().map(ContentItem::Meditation));
        items.extend(breathing_exercises().into_iter().map(ContentItem::Breathing));
        items.extend(mindfulness_guides().into_iter().map(ContentItem::Mindfulness));
        items.extend(white_noise_tracks().into_iter().map(ContentItem::WhiteNoise));
        Self { items }
    }

    pub fn items(&self) -> &[ContentItem] {
        &self.items
    }

    pub fn of_kind(&self, kind: ContentKind) -> impl Iterator<Item = &ContentItem> {
        self.items.iter().filter(move |i| i.kind() == kind)
    }

    pub fn get(&self, id: &str) -> Option<&ContentItem> {
        self.items.iter().find(|i| i.id() == id)
    }

    /// Like [`Catalog::get`], but an id unknown for `kind` falls back to the
    /// kind's default item.
    ///
    /// # Errors
    ///
    /// Fails only if the catalog holds no item of `kind` at all.
    pub fn resolve(&self, kind: ContentKind, id: &str) -> Result<&ContentItem> {
        self.get(id)
            .filter(|i| i.kind() == kind)
            .or_else(|| self.get(kind.default_id()))
            .or_else(|| self.of_kind(kind).next())
            .ok_or_else(|| CoreError::UnknownContent(id.to_string()))
    }

    /// Resolve an id whose kind is inferred from the id itself.
    pub fn lookup(&self, id: &str) -> Result<&ContentItem> {
        if let Some(item) = self.get(id) {
            return Ok(item);
        }
        let kind =
            ContentKind::from_content_id(id).ok_or_else(|| CoreError::UnknownContent(id.into()))?;
        self.resolve(kind, id)
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

fn meditations() -> Vec<MeditationCourse> {
    let course = |id: &str, title: &str, description: &str, minutes, level: &str, category: &str, instructor: &str| {
        MeditationCourse {
            id: id.into(),
            title: title.into(),
            description: description.into(),
            duration_min: minutes,
            level: level.into(),
            category: category.into(),
            instructor: instructor.into(),
        }
    };
    vec![
        course(
            "meditation_001",
            "深度放松冥想",
            "通过引导式呼吸和正念观察，释放身心压力，找回内心的平静与安宁。",
            15,
            "初学者",
            "引导冥想",
            "李静怡",
        ),
        course(
            "meditation_002",
            "正念呼吸冥想",
            "专注于呼吸的正念练习，培养内在觉察力，活在当下这一刻。",
            10,
            "初学者",
            "正念冥想",
            "张明轩",
        ),
        course(
            "meditation_003",
            "睡前放松冥想",
            "温和的睡前冥想引导，帮助你放松身心，进入深度睡眠状态。",
            20,
            "所有人",
            "睡前冥想",
            "王雅琳",
        ),
    ]
}

fn breathing_exercises() -> Vec<BreathingExercise> {
    vec![
        BreathingExercise {
            id: "breathing_001".into(),
            title: "4-7-8呼吸法".into(),
            description: "通过特定的呼吸节奏帮助你快速放松身心，缓解焦虑和压力。".into(),
            phases: vec![
                Phase::new("吸气", 4, "缓慢吸气..."),
                Phase::new("屏息", 7, "保持呼吸..."),
                Phase::new("呼气", 8, "缓慢呼气..."),
            ],
        },
        BreathingExercise {
            id: "breathing_002".into(),
            title: "腹式呼吸".into(),
            description: "通过腹部的扩张和收缩来进行深呼吸，帮助放松神经系统。".into(),
            phases: vec![
                Phase::new("吸气", 5, "腹部鼓起..."),
                Phase::new("屏息", 2, "稍作停顿..."),
                Phase::new("呼气", 6, "腹部收缩..."),
            ],
        },
        BreathingExercise {
            id: "breathing_003".into(),
            title: "交替鼻孔呼吸".into(),
            description: "通过交替堵塞左右鼻孔来调节呼吸，平衡自主神经系统，提升专注力。".into(),
            phases: vec![
                Phase::new("左鼻吸气", 4, "左鼻孔吸气..."),
                Phase::new("屏息", 2, "保持呼吸..."),
                Phase::new("右鼻呼气", 4, "右鼻孔呼气..."),
                Phase::new("右鼻吸气", 4, "右鼻孔吸气..."),
                Phase::new("屏息", 2, "保持呼吸..."),
                Phase::new("左鼻呼气", 4, "左鼻孔呼气..."),
            ],
        },
    ]
}

fn mindfulness_guides() -> Vec<MindfulnessGuide> {
    let guide = |id: &str, title: &str, description: &str, author: &str, audio_secs| MindfulnessGuide {
        id: id.into(),
        title: title.into(),
        description: description.into(),
        author: author.into(),
        audio_secs,
    };
    vec![
        guide("mindfulness_001", "正念行走指南", "在行走中体验当下的力量", "李明", 750),
        guide("mindfulness_002", "正念饮食指南", "学会用心感受每一口食物的美味", "王静", 900),
        guide("mindfulness_003", "正念工作法", "提升工作效率的正念技巧", "张强", 1200),
        guide("mindfulness_004", "正念睡眠指南", "通过正念练习改善睡眠质量", "刘芳", 1080),
    ]
}

fn white_noise_tracks() -> Vec<WhiteNoiseTrack> {
    let track = |id: &str, title: &str, description: &str, icon: &str| WhiteNoiseTrack {
        id: id.into(),
        title: title.into(),
        description: description.into(),
        icon: icon.into(),
    };
    vec![
        track("rain", "雨声白噪音", "轻柔的雨声帮助深度睡眠", "cloud-rain"),
        track("ocean", "海浪声", "海浪拍打岸边的舒缓声音", "water"),
        track("forest", "森林声", "鸟鸣和树叶的自然声音", "tree"),
        track("wind", "风声", "轻柔的风声带来宁静", "wind"),
        track("cafe", "咖啡厅声", "温和的交谈和咖啡香气", "coffee"),
        track("white", "纯白噪音", "均匀的白噪音屏蔽外界干扰", "wave-square"),
    ]
}
