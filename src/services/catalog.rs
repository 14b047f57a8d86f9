use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::models::{PostureRecord, PostureText};
use crate::services::embedding::{Embedder, Embedding, EmbeddingError};

/// Errors that can occur while loading or building the posture catalog
///
/// Every variant is fatal: the service must not start on a partial catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed catalog: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Catalog contains no postures")]
    Empty,

    #[error("Catalog was embedded by '{found}' but the active provider is '{expected}'")]
    ProviderMismatch { expected: String, found: String },

    #[error("Failed to embed posture text: {0}")]
    Encoding(#[from] EmbeddingError),

    #[error("Posture '{name}' is missing its {field} embedding")]
    MissingEmbedding { name: String, field: &'static str },

    #[error("Posture '{name}' has an invalid {field} embedding: {reason}")]
    InvalidEmbedding {
        name: String,
        field: &'static str,
        reason: String,
    },

    #[error("Posture '{name}' {field} embedding has {actual} dimensions, expected {expected}")]
    DimensionMismatch {
        name: String,
        field: &'static str,
        expected: usize,
        actual: usize,
    },
}

/// On-disk catalog artifact
///
/// `provider` names the embedder that produced the vectors. Vectors from
/// different providers live in unrelated spaces even at equal dimensionality.
#[derive(Debug, Serialize, Deserialize)]
struct CatalogArtifact {
    #[serde(default)]
    provider: Option<String>,
    #[serde(default)]
    dimensions: Option<usize>,
    postures: Vec<RawPosture>,
}

/// Posture row as stored in the artifact
///
/// Column names produced by the tabular authoring pipeline are accepted as
/// aliases.
#[derive(Debug, Serialize, Deserialize)]
struct RawPosture {
    #[serde(alias = "AName")]
    name: String,
    #[serde(alias = "Benefits", default)]
    benefits: String,
    #[serde(alias = "Contraindications", default)]
    contraindications: String,
    #[serde(alias = "Targeted Physical Problems", default)]
    targeted_physical_problems: String,
    #[serde(alias = "Targeted Mental Problems", default)]
    targeted_mental_problems: String,
    #[serde(alias = "Benefits_emb", default)]
    benefits_emb: Option<Vec<f32>>,
    #[serde(alias = "Contraindications_emb", default)]
    contraindications_emb: Option<Vec<f32>>,
    #[serde(alias = "Targeted Physical Problems_emb", default)]
    targeted_physical_problems_emb: Option<Vec<f32>>,
    #[serde(alias = "Targeted Mental Problems_emb", default)]
    targeted_mental_problems_emb: Option<Vec<f32>>,
}

impl From<&PostureRecord> for RawPosture {
    fn from(posture: &PostureRecord) -> Self {
        Self {
            name: posture.name.clone(),
            benefits: posture.benefits.clone(),
            contraindications: posture.contraindications.clone(),
            targeted_physical_problems: posture.targeted_physical_problems.clone(),
            targeted_mental_problems: posture.targeted_mental_problems.clone(),
            benefits_emb: Some(posture.benefits_emb.as_slice().to_vec()),
            contraindications_emb: Some(posture.contraindications_emb.as_slice().to_vec()),
            targeted_physical_problems_emb: Some(posture.targeted_physical_emb.as_slice().to_vec()),
            targeted_mental_problems_emb: Some(posture.targeted_mental_emb.as_slice().to_vec()),
        }
    }
}

/// Immutable in-memory posture catalog
///
/// Loaded once at startup and shared read-only across requests.
#[derive(Debug, Clone)]
pub struct Catalog {
    postures: Vec<PostureRecord>,
    dimensions: usize,
}

impl Catalog {
    /// Load and validate a catalog artifact from disk
    ///
    /// # Arguments
    /// * `path` - Path to the JSON artifact
    /// * `provider` - Name of the active embedder
    /// * `expected_dimensions` - Dimensionality of the active embedder
    pub fn load<P: AsRef<Path>>(
        path: P,
        provider: &str,
        expected_dimensions: usize,
    ) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let catalog = Self::from_json(&contents, provider, expected_dimensions)?;

        tracing::info!(
            "Loaded catalog from {} ({} postures, {} dimensions, provider {})",
            path.display(),
            catalog.len(),
            catalog.dimensions(),
            provider
        );

        Ok(catalog)
    }

    /// Parse and validate a catalog artifact from a JSON string
    pub fn from_json(
        json: &str,
        provider: &str,
        expected_dimensions: usize,
    ) -> Result<Self, CatalogError> {
        let artifact: CatalogArtifact = serde_json::from_str(json)?;

        // An artifact without a provider tag cannot be trusted either
        match artifact.provider.as_deref() {
            Some(found) if found == provider => {}
            found => {
                return Err(CatalogError::ProviderMismatch {
                    expected: provider.to_string(),
                    found: found.unwrap_or("unrecorded").to_string(),
                });
            }
        }

        // A declared dimensionality must agree with the embedder
        if let Some(declared) = artifact.dimensions {
            if declared != expected_dimensions {
                return Err(CatalogError::DimensionMismatch {
                    name: "<catalog>".to_string(),
                    field: "declared",
                    expected: expected_dimensions,
                    actual: declared,
                });
            }
        }

        let postures = artifact
            .postures
            .into_iter()
            .map(|raw| validate_posture(raw, expected_dimensions))
            .collect::<Result<Vec<_>, _>>()?;

        Self::from_records(postures)
    }

    /// Embed authored posture text with `embedder`
    pub fn embed(texts: Vec<PostureText>, embedder: &dyn Embedder) -> Result<Self, CatalogError> {
        let postures = texts
            .into_iter()
            .map(|text| {
                let benefits_emb = embedder.encode(&text.benefits)?;
                let contraindications_emb = embedder.encode(&text.contraindications)?;
                let targeted_physical_emb = embedder.encode(&text.targeted_physical_problems)?;
                let targeted_mental_emb = embedder.encode(&text.targeted_mental_problems)?;
                Ok(PostureRecord::new(
                    text,
                    benefits_emb,
                    contraindications_emb,
                    targeted_physical_emb,
                    targeted_mental_emb,
                ))
            })
            .collect::<Result<Vec<_>, CatalogError>>()?;

        Self::from_records(postures)
    }

    /// Serialize into the on-disk artifact format, tagged with `provider`
    pub fn to_artifact_json(&self, provider: &str) -> Result<String, CatalogError> {
        let artifact = CatalogArtifact {
            provider: Some(provider.to_string()),
            dimensions: Some(self.dimensions),
            postures: self.postures.iter().map(RawPosture::from).collect(),
        };

        Ok(serde_json::to_string(&artifact)?)
    }

    /// Build a catalog from already-validated records
    ///
    /// All records must share one embedding dimensionality.
    pub fn from_records(postures: Vec<PostureRecord>) -> Result<Self, CatalogError> {
        let first = postures.first().ok_or(CatalogError::Empty)?;
        let dimensions = first.benefits_emb.dimensions();

        for posture in &postures {
            for (field, embedding) in embedding_fields(posture) {
                if embedding.dimensions() != dimensions {
                    return Err(CatalogError::DimensionMismatch {
                        name: posture.name.clone(),
                        field,
                        expected: dimensions,
                        actual: embedding.dimensions(),
                    });
                }
            }
        }

        let mut seen = HashSet::new();
        for posture in &postures {
            if !seen.insert(posture.name.as_str()) {
                tracing::warn!("Duplicate posture name in catalog: {}", posture.name);
            }
        }

        Ok(Self { postures, dimensions })
    }

    pub fn len(&self) -> usize {
        self.postures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.postures.is_empty()
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PostureRecord> {
        self.postures.iter()
    }

    /// Look up a posture by name (first match)
    pub fn get(&self, name: &str) -> Option<&PostureRecord> {
        self.postures.iter().find(|p| p.name == name)
    }
}

fn embedding_fields(posture: &PostureRecord) -> [(&'static str, &Embedding); 4] {
    [
        ("benefits", &posture.benefits_emb),
        ("contraindications", &posture.contraindications_emb),
        ("targeted physical problems", &posture.targeted_physical_emb),
        ("targeted mental problems", &posture.targeted_mental_emb),
    ]
}

fn validate_posture(raw: RawPosture, expected_dimensions: usize) -> Result<PostureRecord, CatalogError> {
    let name = raw.name;

    let benefits_emb = validate_embedding(&name, "benefits", raw.benefits_emb, expected_dimensions)?;
    let contraindications_emb = validate_embedding(
        &name,
        "contraindications",
        raw.contraindications_emb,
        expected_dimensions,
    )?;
    let targeted_physical_emb = validate_embedding(
        &name,
        "targeted physical problems",
        raw.targeted_physical_problems_emb,
        expected_dimensions,
    )?;
    let targeted_mental_emb = validate_embedding(
        &name,
        "targeted mental problems",
        raw.targeted_mental_problems_emb,
        expected_dimensions,
    )?;

    let text = PostureText {
        name,
        benefits: raw.benefits,
        contraindications: raw.contraindications,
        targeted_physical_problems: raw.targeted_physical_problems,
        targeted_mental_problems: raw.targeted_mental_problems,
    };

    Ok(PostureRecord::new(
        text,
        benefits_emb,
        contraindications_emb,
        targeted_physical_emb,
        targeted_mental_emb,
    ))
}

fn validate_embedding(
    name: &str,
    field: &'static str,
    values: Option<Vec<f32>>,
    expected_dimensions: usize,
) -> Result<Embedding, CatalogError> {
    let values = values.ok_or_else(|| CatalogError::MissingEmbedding {
        name: name.to_string(),
        field,
    })?;

    if values.is_empty() {
        return Err(CatalogError::MissingEmbedding {
            name: name.to_string(),
            field,
        });
    }

    if values.len() != expected_dimensions {
        return Err(CatalogError::DimensionMismatch {
            name: name.to_string(),
            field,
            expected: expected_dimensions,
            actual: values.len(),
        });
    }

    if let Some(index) = values.iter().position(|v| !v.is_finite()) {
        return Err(CatalogError::InvalidEmbedding {
            name: name.to_string(),
            field,
            reason: format!("non-finite component at index {}", index),
        });
    }

    Ok(Embedding::raw(values))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::embedding::HashEmbedder;
    use serde_json::json;

    fn posture_json(name: &str, dims: usize) -> serde_json::Value {
        let emb: Vec<f32> = (0..dims).map(|i| if i == 0 { 1.0 } else { 0.0 }).collect();
        json!({
            "name": name,
            "benefits": "calms the mind",
            "contraindications": "knee injury",
            "targeted_physical_problems": "tight hips",
            "targeted_mental_problems": "stress",
            "benefits_emb": emb,
            "contraindications_emb": emb,
            "targeted_physical_problems_emb": emb,
            "targeted_mental_problems_emb": emb,
        })
    }

    fn artifact(postures: Vec<serde_json::Value>) -> String {
        json!({ "provider": "hashing", "postures": postures }).to_string()
    }

    fn posture_text(name: &str, benefits: &str, contraindications: &str) -> PostureText {
        PostureText {
            name: name.to_string(),
            benefits: benefits.to_string(),
            contraindications: contraindications.to_string(),
            targeted_physical_problems: "back pain".to_string(),
            targeted_mental_problems: "stress".to_string(),
        }
    }

    #[test]
    fn test_load_valid_catalog() {
        let doc = json!({
            "provider": "hashing",
            "dimensions": 4,
            "postures": [posture_json("Lotus", 4), posture_json("Bridge", 4)]
        });
        let catalog = Catalog::from_json(&doc.to_string(), "hashing", 4).unwrap();

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.dimensions(), 4);
        assert_eq!(catalog.get("Bridge").unwrap().contraindications, "knee injury");
        assert!(catalog.get("Crow").is_none());
    }

    #[test]
    fn test_accepts_tabular_column_names() {
        let emb = vec![0.0f32, 1.0];
        let doc = json!({
            "provider": "hashing",
            "postures": [{
                "AName": "Child's Pose",
                "Benefits": "relaxation, stress relief",
                "Contraindications": "Knee Injury",
                "Targeted Physical Problems": "back tension",
                "Targeted Mental Problems": "anxiety",
                "Benefits_emb": emb,
                "Contraindications_emb": emb,
                "Targeted Physical Problems_emb": emb,
                "Targeted Mental Problems_emb": emb,
            }]
        });

        let catalog = Catalog::from_json(&doc.to_string(), "hashing", 2).unwrap();
        let posture = catalog.get("Child's Pose").unwrap();
        assert_eq!(posture.benefits, "relaxation, stress relief");
        assert_eq!(posture.targeted_mental_problems, "anxiety");
        assert_eq!(posture.contraindications_lower(), "knee injury");
    }

    #[test]
    fn test_foreign_provider_is_fatal() {
        // Same dimensionality, different embedding space
        let doc = json!({ "provider": "minilm", "dimensions": 4, "postures": [posture_json("Plank", 4)] });

        let err = Catalog::from_json(&doc.to_string(), "hashing", 4).unwrap_err();
        assert!(matches!(
            err,
            CatalogError::ProviderMismatch { ref expected, ref found } if expected == "hashing" && found == "minilm"
        ));
    }

    #[test]
    fn test_untagged_artifact_is_fatal() {
        let doc = json!({ "dimensions": 4, "postures": [posture_json("Plank", 4)] });

        let err = Catalog::from_json(&doc.to_string(), "hashing", 4).unwrap_err();
        assert!(matches!(err, CatalogError::ProviderMismatch { ref found, .. } if found == "unrecorded"));
    }

    #[test]
    fn test_missing_embedding_is_fatal() {
        let mut posture = posture_json("Plank", 4);
        posture.as_object_mut().unwrap().remove("targeted_mental_problems_emb");

        let err = Catalog::from_json(&artifact(vec![posture]), "hashing", 4).unwrap_err();
        assert!(matches!(
            err,
            CatalogError::MissingEmbedding { field: "targeted mental problems", .. }
        ));
    }

    #[test]
    fn test_empty_embedding_is_fatal() {
        let mut posture = posture_json("Plank", 4);
        posture["benefits_emb"] = json!([]);

        let err = Catalog::from_json(&artifact(vec![posture]), "hashing", 4).unwrap_err();
        assert!(matches!(err, CatalogError::MissingEmbedding { field: "benefits", .. }));
    }

    #[test]
    fn test_dimension_mismatch_is_fatal() {
        let err = Catalog::from_json(&artifact(vec![posture_json("Plank", 3)]), "hashing", 4).unwrap_err();
        assert!(matches!(err, CatalogError::DimensionMismatch { expected: 4, actual: 3, .. }));
    }

    #[test]
    fn test_non_finite_component_is_fatal() {
        // Overflows f32 on deserialization
        let mut posture = posture_json("Plank", 4);
        posture["contraindications_emb"] = serde_json::from_str("[1e300, 0.0, 0.0, 0.0]").unwrap();

        let err = Catalog::from_json(&artifact(vec![posture]), "hashing", 4).unwrap_err();
        assert!(matches!(err, CatalogError::InvalidEmbedding { field: "contraindications", .. }));
    }

    #[test]
    fn test_declared_dimensions_mismatch_is_fatal() {
        let doc = json!({ "provider": "hashing", "dimensions": 8, "postures": [posture_json("Plank", 4)] });

        let err = Catalog::from_json(&doc.to_string(), "hashing", 4).unwrap_err();
        assert!(matches!(err, CatalogError::DimensionMismatch { expected: 4, actual: 8, .. }));
    }

    #[test]
    fn test_empty_catalog_is_fatal() {
        let err = Catalog::from_json(&artifact(vec![]), "hashing", 4).unwrap_err();
        assert!(matches!(err, CatalogError::Empty));
    }

    #[test]
    fn test_malformed_json_is_fatal() {
        let err = Catalog::from_json("{ not json", "hashing", 4).unwrap_err();
        assert!(matches!(err, CatalogError::Parse(_)));
    }

    #[test]
    fn test_missing_file_is_fatal() {
        let err = Catalog::load("/nonexistent/asanas.json", "hashing", 4).unwrap_err();
        assert!(matches!(err, CatalogError::Io { .. }));
    }

    #[test]
    fn test_duplicate_names_are_kept() {
        let postures = vec![posture_json("Lotus", 4), posture_json("Lotus", 4)];
        let catalog = Catalog::from_json(&artifact(postures), "hashing", 4).unwrap();

        assert_eq!(catalog.len(), 2);
    }

    #[test]
    fn test_embed_and_write_artifact() {
        let embedder = HashEmbedder::new(32);
        let texts = vec![
            posture_text("Cat-Cow", "spine flexibility", "wrist injury"),
            posture_text("Tree Pose", "balance, focus", "vertigo"),
        ];

        let catalog = Catalog::embed(texts, &embedder).unwrap();
        let json = catalog.to_artifact_json(embedder.name()).unwrap();
        let reloaded = Catalog::from_json(&json, "hashing", 32).unwrap();

        assert_eq!(reloaded.len(), 2);
        let cat_cow = reloaded.get("Cat-Cow").unwrap();
        assert_eq!(cat_cow.benefits_emb, embedder.encode("spine flexibility").unwrap());
        assert_eq!(cat_cow.contraindications, "wrist injury");

        assert!(matches!(
            Catalog::from_json(&json, "minilm", 32),
            Err(CatalogError::ProviderMismatch { .. })
        ));
    }

    #[test]
    fn test_embed_propagates_encoding_failure() {
        let embedder = HashEmbedder::new(32).with_max_input_bytes(4);
        let texts = vec![posture_text("Cat-Cow", "spine flexibility", "wrist injury")];

        assert!(matches!(Catalog::embed(texts, &embedder), Err(CatalogError::Encoding(_))));
    }

    #[test]
    fn test_embed_empty_is_fatal() {
        assert!(matches!(
            Catalog::embed(vec![], &HashEmbedder::new(8)),
            Err(CatalogError::Empty)
        ));
    }
}
