// Shared fixtures for integration tests
#![allow(dead_code)]

use asana_recommender::services::{Catalog, Embedder, Embedding, EmbeddingError, HashEmbedder};
use asana_recommender::{PostureRecord, PostureText, UserProfile};
use std::collections::HashMap;

pub const DIMENSIONS: usize = 384;

/// (name, benefits, contraindications, targeted physical, targeted mental)
pub const POSTURES: &[(&str, &str, &str, &str, &str)] = &[
    (
        "Child's Pose",
        "relaxation, stress relief, calms the mind, gentle stretch",
        "knee injury, pregnancy, diarrhea",
        "neck tension, tight hips",
        "stress, fatigue",
    ),
    (
        "Headstand",
        "strength, focus, improves concentration",
        "neck injury, high blood pressure, heart disease",
        "weak shoulders",
        "lack of focus",
    ),
    (
        "Cat-Cow",
        "spine flexibility, relieves back pain, stress relief",
        "wrist injury",
        "back pain, stiffness",
        "stress",
    ),
    (
        "Corpse Pose",
        "deep relaxation, reduces stress, anxiety and insomnia",
        "none",
        "fatigue",
        "anxiety, insomnia, stress",
    ),
    (
        "Warrior II",
        "leg strength, stamina, balance",
        "knee injury, high blood pressure",
        "weak legs",
        "low confidence",
    ),
    (
        "Bridge Pose",
        "opens chest, strengthens back, reduces anxiety",
        "neck injury",
        "back pain, poor posture",
        "anxiety, mild depression",
    ),
    (
        "Tree Pose",
        "balance, focus, leg strength",
        "vertigo, low blood pressure",
        "weak ankles",
        "lack of focus",
    ),
    (
        "Seated Forward Bend",
        "stretches hamstrings, calms the mind, relieves stress",
        "back injury, asthma",
        "tight hamstrings",
        "stress, anxiety",
    ),
];

pub fn build_posture(
    embedder: &dyn Embedder,
    name: &str,
    benefits: &str,
    contraindications: &str,
    physical: &str,
    mental: &str,
) -> PostureRecord {
    PostureRecord::new(
        posture_text(name, benefits, contraindications, physical, mental),
        embedder.encode(benefits).unwrap(),
        embedder.encode(contraindications).unwrap(),
        embedder.encode(physical).unwrap(),
        embedder.encode(mental).unwrap(),
    )
}

pub fn posture_text(name: &str, benefits: &str, contraindications: &str, physical: &str, mental: &str) -> PostureText {
    PostureText {
        name: name.to_string(),
        benefits: benefits.to_string(),
        contraindications: contraindications.to_string(),
        targeted_physical_problems: physical.to_string(),
        targeted_mental_problems: mental.to_string(),
    }
}

pub fn build_catalog(embedder: &dyn Embedder) -> Catalog {
    let postures = POSTURES
        .iter()
        .map(|(name, benefits, contra, physical, mental)| {
            build_posture(embedder, name, benefits, contra, physical, mental)
        })
        .collect();

    Catalog::from_records(postures).unwrap()
}

/// Serialize the fixture catalog in the on-disk artifact format
pub fn catalog_artifact(embedder: &dyn Embedder) -> serde_json::Value {
    let postures: Vec<serde_json::Value> = POSTURES
        .iter()
        .map(|(name, benefits, contra, physical, mental)| {
            serde_json::json!({
                "name": name,
                "benefits": benefits,
                "contraindications": contra,
                "targeted_physical_problems": physical,
                "targeted_mental_problems": mental,
                "benefits_emb": embedder.encode(benefits).unwrap(),
                "contraindications_emb": embedder.encode(contra).unwrap(),
                "targeted_physical_problems_emb": embedder.encode(physical).unwrap(),
                "targeted_mental_problems_emb": embedder.encode(mental).unwrap(),
            })
        })
        .collect();

    serde_json::json!({
        "provider": embedder.name(),
        "dimensions": embedder.dimensions(),
        "postures": postures
    })
}

/// Path of the sample artifact shipped under `data/`
pub fn shipped_catalog_path() -> std::path::PathBuf {
    std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("data/asanas.json")
}

pub fn hash_embedder() -> HashEmbedder {
    HashEmbedder::new(DIMENSIONS)
}

pub fn create_profile(goals: &[&str], physical: &[&str], mental: &[&str]) -> UserProfile {
    UserProfile {
        age: 32,
        height: 170,
        weight: 64,
        goals: goals.iter().map(|s| s.to_string()).collect(),
        physical_issues: physical.iter().map(|s| s.to_string()).collect(),
        mental_issues: mental.iter().map(|s| s.to_string()).collect(),
        level: "beginner".to_string(),
    }
}

/// Test double mapping known texts to fixed vectors and everything else to zero
pub struct TableEmbedder {
    table: HashMap<String, Vec<f32>>,
    dims: usize,
}

impl TableEmbedder {
    pub fn new(dims: usize, entries: &[(&str, Vec<f32>)]) -> Self {
        Self {
            table: entries.iter().map(|(k, v)| (k.to_string(), v.clone())).collect(),
            dims,
        }
    }
}

impl Embedder for TableEmbedder {
    fn encode(&self, text: &str) -> Result<Embedding, EmbeddingError> {
        match self.table.get(text) {
            Some(v) => Ok(Embedding::new(v.clone())),
            None => Ok(Embedding::zeros(self.dims)),
        }
    }

    fn dimensions(&self) -> usize {
        self.dims
    }

    fn name(&self) -> &str {
        "table"
    }
}
