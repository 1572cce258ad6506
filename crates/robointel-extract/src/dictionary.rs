//! Deterministic bilingual keyword spotting over static domain dictionaries.
//!
//! The dictionaries are immutable configuration data loaded once at process
//! start. Matching is case-insensitive substring counting; relevance rewards
//! repetition and term importance while staying bounded to [0, 1].

use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use robointel_core::{clamp01, Language};

/// Korean domain vocabulary: robot types, technologies, components,
/// companies, applications, specs and market terms.
static KO_TERMS: Lazy<Vec<&'static str>> = Lazy::new(|| {
    vec![
        // 로봇 유형
        "휴머노이드", "로봇", "이족보행", "양팔", "다관절", "협동로봇", "서비스로봇",
        // 기술
        "액추에이터", "센서", "인공지능", "머신러닝", "딥러닝", "강화학습",
        "컴퓨터 비전", "자연어처리", "대규모 언어모델",
        // 부품
        "모터", "감속기", "하모닉 드라이브", "토크센서", "힘센서",
        "라이다", "뎁스카메라", "촉각센서",
        // 회사
        "테슬라", "옵티머스", "피규어", "보스턴 다이나믹스", "아틀라스",
        "유니트리", "샤오미", "현대로보틱스", "삼성", "네이버",
        // 적용 분야
        "물류", "제조", "의료", "가정용", "산업용", "창고", "공장",
        // 스펙
        "자유도", "페이로드", "배터리", "토크",
        // 시장/비즈니스
        "상용화", "양산", "파일럿", "시연", "투자", "펀딩",
    ]
});

/// English domain vocabulary, mirroring the Korean list.
static EN_TERMS: Lazy<Vec<&'static str>> = Lazy::new(|| {
    vec![
        // Robot types
        "humanoid", "robot", "bipedal", "dual-arm", "cobot", "service robot",
        // Technology
        "actuator", "sensor", "artificial intelligence", "machine learning",
        "deep learning", "reinforcement learning", "computer vision", "LLM",
        "large language model", "foundation model", "transformer", "neural network",
        // Components
        "motor", "gearbox", "harmonic drive", "torque sensor", "force sensor",
        "IMU", "LiDAR", "depth camera", "tactile sensor", "encoder",
        // Companies
        "Tesla", "Optimus", "Figure", "Boston Dynamics", "Atlas", "Unitree",
        "Xiaomi", "Hyundai", "Apptronik", "Apollo", "Sanctuary AI", "UBTECH",
        // Applications
        "logistics", "manufacturing", "healthcare", "warehouse", "factory",
        "retail", "hospitality",
        // Specs
        "degrees of freedom", "payload", "battery", "torque", "TOPS", "SoC",
        // Market/Business
        "commercialization", "mass production", "pilot", "demo", "investment",
        "funding", "IPO", "valuation",
    ]
});

/// Lowercased term → category. Terms outside the map are uncategorized.
static CATEGORY_BY_TERM: Lazy<HashMap<String, &'static str>> = Lazy::new(|| {
    let groups: [(&str, &[&str]); 5] = [
        (
            "technology",
            &[
                "artificial intelligence", "인공지능", "machine learning", "머신러닝",
                "deep learning", "딥러닝", "reinforcement learning", "강화학습",
                "computer vision", "컴퓨터 비전", "자연어처리", "LLM",
                "large language model", "대규모 언어모델", "transformer",
                "neural network", "foundation model",
            ],
        ),
        (
            "component",
            &[
                "actuator", "액추에이터", "motor", "모터", "sensor", "센서",
                "gearbox", "감속기", "harmonic drive", "하모닉 드라이브", "IMU",
                "LiDAR", "라이다", "encoder", "torque sensor", "토크센서",
                "depth camera", "뎁스카메라", "tactile sensor", "촉각센서",
            ],
        ),
        (
            "company",
            &[
                "Tesla", "테슬라", "Figure", "피규어", "Boston Dynamics",
                "보스턴 다이나믹스", "Unitree", "유니트리", "Xiaomi", "샤오미",
                "Hyundai", "현대로보틱스", "Apptronik", "Sanctuary AI", "UBTECH",
            ],
        ),
        (
            "application",
            &[
                "logistics", "물류", "manufacturing", "제조", "healthcare", "의료",
                "warehouse", "창고", "factory", "공장", "retail", "hospitality",
            ],
        ),
        (
            "business",
            &[
                "commercialization", "상용화", "investment", "투자", "funding",
                "펀딩", "IPO", "pilot", "파일럿", "demo", "시연", "mass production",
                "양산",
            ],
        ),
    ];

    let mut map = HashMap::new();
    for (category, terms) in groups {
        for term in terms {
            map.insert(term.to_lowercase(), category);
        }
    }
    map
});

/// A dictionary hit in a text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DictionaryKeyword {
    pub term: String,
    pub language: Language,
    /// Bounded relevance score in [0, 1].
    pub relevance: f64,
    /// Occurrence count in the text.
    pub frequency: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

/// Extract dictionary keywords from a text in one language, sorted by
/// relevance descending. Pure; no I/O.
pub fn extract(text: &str, language: Language) -> Vec<DictionaryKeyword> {
    let text_lower = text.to_lowercase();
    let terms = match language {
        Language::Ko => &*KO_TERMS,
        Language::En => &*EN_TERMS,
    };

    let mut extracted: Vec<DictionaryKeyword> = terms
        .iter()
        .filter_map(|term| {
            let term_lower = term.to_lowercase();
            let frequency = text_lower.matches(&term_lower).count();
            if frequency == 0 {
                return None;
            }
            Some(DictionaryKeyword {
                term: (*term).to_string(),
                language,
                relevance: relevance(frequency, text.chars().count(), term),
                frequency,
                category: category_of(term).map(str::to_string),
            })
        })
        .collect();

    sort_by_relevance(&mut extracted);
    extracted
}

/// Run both dictionaries and merge by case-insensitive term, keeping the
/// higher relevance on conflict.
pub fn extract_multilingual(text: &str) -> Vec<DictionaryKeyword> {
    let mut merged: HashMap<String, DictionaryKeyword> = HashMap::new();
    for kw in extract(text, Language::Ko)
        .into_iter()
        .chain(extract(text, Language::En))
    {
        let key = kw.term.to_lowercase();
        match merged.get(&key) {
            Some(existing) if existing.relevance >= kw.relevance => {}
            _ => {
                merged.insert(key, kw);
            }
        }
    }

    let mut result: Vec<DictionaryKeyword> = merged.into_values().collect();
    sort_by_relevance(&mut result);
    result
}

/// `clamp01((frequency / (chars/100)) * importance_weight)` — term frequency
/// per 100 characters, weighted by category importance.
fn relevance(frequency: usize, text_chars: usize, term: &str) -> f64 {
    let tf = frequency as f64 / (text_chars.max(1) as f64 / 100.0);
    clamp01(tf * importance_weight(term))
}

/// Company names weigh 1.5, technology terms 1.2, components 1.1, rest 1.0.
fn importance_weight(term: &str) -> f64 {
    match category_of(term) {
        Some("company") => 1.5,
        Some("technology") => 1.2,
        Some("component") => 1.1,
        _ => 1.0,
    }
}

fn category_of(term: &str) -> Option<&'static str> {
    CATEGORY_BY_TERM.get(&term.to_lowercase()).copied()
}

/// Relevance descending, term ascending on ties, so output is deterministic.
fn sort_by_relevance(keywords: &mut [DictionaryKeyword]) {
    keywords.sort_by(|a, b| {
        b.relevance
            .partial_cmp(&a.relevance)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.term.cmp(&b.term))
    });
}
