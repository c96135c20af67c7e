use crate::domain::model::ContractArtifact;
use crate::domain::ports::ArtifactSource;
use crate::utils::error::{DeployError, Result};
use alloy::json_abi::JsonAbi;
use alloy::primitives::Bytes;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use walkdir::WalkDir;

/// Hardhat 的 artifact JSON (`hh-sol-artifact-1`)
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HardhatArtifactFile {
    contract_name: String,
    source_name: String,
    abi: JsonAbi,
    bytecode: String,
    #[serde(default)]
    link_references: BTreeMap<String, BTreeMap<String, Value>>,
}

/// 以 Hardhat 的 `artifacts/` 目錄為來源，依合約名稱查找
#[derive(Debug, Clone)]
pub struct HardhatArtifacts {
    root: PathBuf,
}

impl HardhatArtifacts {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    /// `contracts/Token.sol:Token` 形式的完整名稱拆成 (source, contract)
    fn split_qualified_name(name: &str) -> (Option<&str>, &str) {
        match name.rsplit_once(':') {
            Some((source, contract)) => (Some(source), contract),
            None => (None, name),
        }
    }

    fn candidate_files(&self, contract: &str) -> Vec<PathBuf> {
        let file_name = format!("{}.json", contract);

        WalkDir::new(&self.root)
            .into_iter()
            .filter_entry(|entry| entry.file_name() != "build-info")
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file() && entry.file_name() == file_name.as_str())
            .map(|entry| entry.into_path())
            .collect()
    }

    fn read_artifact(path: &Path) -> Result<HardhatArtifactFile> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

impl ArtifactSource for HardhatArtifacts {
    fn load(&self, contract_name: &str) -> Result<ContractArtifact> {
        let (source, contract) = Self::split_qualified_name(contract_name);

        let mut matches = Vec::new();
        for path in self.candidate_files(contract) {
            let artifact = Self::read_artifact(&path)?;
            if artifact.contract_name != contract {
                continue;
            }
            if let Some(source) = source {
                if artifact.source_name != source {
                    continue;
                }
            }
            matches.push((path, artifact));
        }

        if matches.len() > 1 {
            return Err(DeployError::AmbiguousArtifact {
                contract: contract_name.to_string(),
                candidates: matches
                    .iter()
                    .map(|(_, artifact)| format!("{}:{}", artifact.source_name, artifact.contract_name))
                    .collect(),
            });
        }

        let (path, artifact) = matches.pop().ok_or_else(|| DeployError::ArtifactNotFound {
            contract: contract_name.to_string(),
            search_path: self.root.display().to_string(),
        })?;

        tracing::debug!("Loaded artifact {} from {}", contract_name, path.display());
        into_contract_artifact(artifact)
    }
}

fn into_contract_artifact(artifact: HardhatArtifactFile) -> Result<ContractArtifact> {
    let libraries: Vec<String> = artifact
        .link_references
        .iter()
        .flat_map(|(source, libs)| libs.keys().map(move |lib| format!("{}:{}", source, lib)))
        .collect();
    if !libraries.is_empty() {
        return Err(DeployError::UnlinkedLibraries {
            contract: artifact.contract_name,
            libraries,
        });
    }

    let bytecode =
        Bytes::from_str(&artifact.bytecode).map_err(|e| DeployError::InvalidBytecode {
            contract: artifact.contract_name.clone(),
            reason: e.to_string(),
        })?;
    if bytecode.is_empty() {
        return Err(DeployError::EmptyBytecode {
            contract: artifact.contract_name,
        });
    }

    Ok(ContractArtifact {
        contract_name: artifact.contract_name,
        source_name: artifact.source_name,
        abi: artifact.abi,
        bytecode,
    })
}
