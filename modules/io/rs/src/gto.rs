//! Genome typed objects: JSON documents with the genome metadata, contig DNA and annotated features.

use std::path::Path;

use ahash::AHashMap;
use derive_getters::{Dissolve, Getters};
use eyre::{ensure, eyre, Result, WrapErr};
use protmatch_core_rs::loc::{Location, Strand};
use serde::Deserialize;

use crate::compression;

pub const DEFAULT_GENETIC_CODE: u8 = 11;

#[derive(Deserialize)]
struct RawGenome {
    id: String,
    #[serde(default)]
    scientific_name: String,
    #[serde(default = "default_genetic_code")]
    genetic_code: u8,
    #[serde(default)]
    domain: String,
    #[serde(default)]
    contigs: Vec<RawContig>,
    #[serde(default)]
    features: Vec<RawFeature>,
}

fn default_genetic_code() -> u8 {
    DEFAULT_GENETIC_CODE
}

#[derive(Deserialize)]
struct RawContig {
    id: String,
    #[serde(default)]
    dna: String,
}

#[derive(Deserialize)]
struct RawFeature {
    id: String,
    #[serde(default, rename = "type")]
    kind: String,
    #[serde(default)]
    location: Vec<(String, u64, String, u64)>,
    #[serde(default)]
    protein_translation: Option<String>,
}

#[derive(Clone, PartialEq, Eq, Debug, Dissolve, Getters)]
pub struct Contig {
    id: String,
    dna: Vec<u8>,
}

impl Contig {
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> u64 {
        self.dna.len() as u64
    }
}

#[derive(Clone, PartialEq, Eq, Debug, Dissolve, Getters)]
pub struct Feature {
    id: String,
    kind: String,
    location: Location,
    protein: Option<String>,
}

#[derive(Clone, Debug, Getters)]
pub struct Genome {
    id: String,
    name: String,
    genetic_code: u8,
    domain: String,
    contigs: Vec<Contig>,
    features: Vec<Feature>,
    #[getter(skip)]
    index: AHashMap<String, usize>,
}

impl Genome {
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: RawGenome = serde_json::from_str(json)?;
        Self::try_from(raw)
    }

    /// Load a (possibly gzipped) GTO file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let reader = compression::read_file(path)?;
        let raw: RawGenome = serde_json::from_reader(reader)
            .wrap_err_with(|| format!("Failed to parse genome {}", path.display()))?;
        Self::try_from(raw).wrap_err_with(|| format!("Invalid genome {}", path.display()))
    }

    pub fn contig(&self, id: &str) -> Option<&Contig> {
        self.index.get(id).map(|ind| &self.contigs[*ind])
    }

    /// Genomic DNA covered by the location, reverse complemented on the reverse strand.
    pub fn dna(&self, location: &Location) -> Result<Vec<u8>> {
        let contig = self
            .contig(location.contig())
            .ok_or_else(|| eyre!("Contig {} not found in genome {}", location.contig(), self.id))?;
        location.dna(contig.dna())
    }

    /// Features with a protein translation.
    pub fn pegs(&self) -> impl Iterator<Item = &Feature> {
        self.features.iter().filter(|x| x.protein.is_some())
    }

    /// Bacteria and Archaea genomes use the prokaryotic gene model.
    pub fn is_prokaryotic(&self) -> bool {
        matches!(self.domain.as_str(), "Bacteria" | "Archaea")
    }
}

impl TryFrom<RawGenome> for Genome {
    type Error = eyre::Report;

    fn try_from(raw: RawGenome) -> Result<Self> {
        let contigs: Vec<Contig> = raw
            .contigs
            .into_iter()
            .map(|x| Contig {
                id: x.id,
                dna: x.dna.into_bytes().to_ascii_lowercase(),
            })
            .collect();

        let mut index = AHashMap::with_capacity(contigs.len());
        for (ind, contig) in contigs.iter().enumerate() {
            ensure!(
                index.insert(contig.id.clone(), ind).is_none(),
                "Duplicated contig {} in genome {}",
                contig.id,
                raw.id
            );
        }

        let mut features = Vec::with_capacity(raw.features.len());
        for feature in raw.features {
            let mut span: Option<Location> = None;
            for (contig, begin, strand, len) in &feature.location {
                let segment = Location::from_begin(
                    contig.as_str(),
                    *begin,
                    Strand::try_from(strand.as_str())?,
                    *len,
                )
                .wrap_err_with(|| format!("Invalid location of feature {}", feature.id))?;
                span = match span {
                    None => Some(segment),
                    Some(span) if span.contig() == segment.contig() => Some(span.merged(&segment)),
                    Some(span) => {
                        log::warn!(
                            "Feature {} spans several contigs, only {} is kept",
                            feature.id,
                            span.contig()
                        );
                        Some(span)
                    }
                };
            }
            let Some(location) = span else {
                log::warn!("Feature {} has no location and is skipped", feature.id);
                continue;
            };

            features.push(Feature {
                id: feature.id,
                kind: feature.kind,
                location,
                protein: feature.protein_translation.filter(|x| !x.is_empty()),
            });
        }

        Ok(Self {
            id: raw.id,
            name: raw.scientific_name,
            genetic_code: raw.genetic_code,
            domain: raw.domain,
            contigs,
            features,
            index,
        })
    }
}
