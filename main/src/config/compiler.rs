// Copyright 2023-2024, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/cargo-stylus/blob/main/licenses/COPYRIGHT.md

use super::raw::{RawCompiler, RawOptimizer, RawSettings};
use crate::{
    constants::DEFAULT_OPTIMIZER_RUNS,
    error::{ResolutionError, ValidationError},
};
use semver::{Version, VersionReq};
use std::collections::BTreeMap;

/// Published solc releases, as `(major, minor, first patch, last patch)`.
const SOLC_RELEASES: &[(u64, u64, u64, u64)] = &[
    (0, 4, 11, 26),
    (0, 5, 0, 17),
    (0, 6, 0, 12),
    (0, 7, 0, 6),
    (0, 8, 0, 28),
];

/// Parses a compiler version and checks it against the known solc releases.
pub fn resolve_version(version: &str) -> Result<Version, ResolutionError> {
    let parsed = Version::parse(version.trim()).map_err(|source| ResolutionError::Malformed {
        version: version.to_string(),
        source,
    })?;
    if !parsed.pre.is_empty() || !parsed.build.is_empty() || !is_release(&parsed) {
        return Err(ResolutionError::Unsupported {
            version: version.to_string(),
        });
    }
    Ok(parsed)
}

fn is_release(version: &Version) -> bool {
    SOLC_RELEASES.iter().any(|&(major, minor, first, last)| {
        version.major == major
            && version.minor == minor
            && (first..=last).contains(&version.patch)
    })
}

/// Optimizer pass settings handed to the compiler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptimizerSettings {
    pub enabled: bool,
    /// Expected number of executions of each opcode over the contract lifetime.
    /// Higher values favor cheaper runtime calls over smaller deployments.
    pub runs: u32,
}

impl Default for OptimizerSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            runs: DEFAULT_OPTIMIZER_RUNS,
        }
    }
}

/// A compiler version together with its settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilerProfile {
    pub version: Version,
    pub optimizer: OptimizerSettings,
}

impl CompilerProfile {
    pub fn new(version: Version, optimizer: OptimizerSettings) -> Self {
        Self { version, optimizer }
    }

    pub(crate) fn from_raw(
        raw: &RawCompiler,
        field: &str,
        errors: &mut Vec<ValidationError>,
    ) -> Result<Option<Self>, ResolutionError> {
        let version = resolve_version(&raw.version)?;
        let runs = match raw.settings.optimizer.runs {
            None => DEFAULT_OPTIMIZER_RUNS,
            Some(runs) => match u32::try_from(runs) {
                Ok(runs) => runs,
                Err(_) => {
                    errors.push(ValidationError::new(
                        format!("{field}.settings.optimizer.runs"),
                        format!("must be an integer between 0 and {}, got {runs}", u32::MAX),
                    ));
                    return Ok(None);
                }
            },
        };
        Ok(Some(Self::new(
            version,
            OptimizerSettings {
                enabled: raw.settings.optimizer.enabled,
                runs,
            },
        )))
    }

    pub(crate) fn to_raw(&self) -> RawCompiler {
        RawCompiler {
            version: self.version.to_string(),
            settings: RawSettings {
                optimizer: RawOptimizer {
                    enabled: self.optimizer.enabled,
                    runs: Some(i64::from(self.optimizer.runs)),
                },
            },
        }
    }
}

/// The `solidity` section of the descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolidityConfig {
    /// Never empty. Earlier entries take precedence.
    pub compilers: Vec<CompilerProfile>,
    /// Per-source profiles keyed by source path; these win over `compilers`.
    pub overrides: BTreeMap<String, CompilerProfile>,
}

impl SolidityConfig {
    /// Picks the first profile, in declaration order, satisfying a source's
    /// version pragma.
    pub fn compiler_for(&self, requirement: &VersionReq) -> Option<&CompilerProfile> {
        self.compilers
            .iter()
            .find(|profile| requirement.matches(&profile.version))
    }

    /// Like [`Self::compiler_for`], but an override for `source` is used if present.
    pub fn compiler_for_source(
        &self,
        source: &str,
        requirement: &VersionReq,
    ) -> Option<&CompilerProfile> {
        match self.overrides.get(source) {
            Some(profile) => Some(profile),
            None => self.compiler_for(requirement),
        }
    }

    /// Every distinct compiler version the toolchain needs installed.
    pub fn versions(&self) -> Vec<&Version> {
        let mut versions: Vec<&Version> = self
            .compilers
            .iter()
            .chain(self.overrides.values())
            .map(|profile| &profile.version)
            .collect();
        versions.sort();
        versions.dedup();
        versions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(version: &str, runs: u32) -> CompilerProfile {
        CompilerProfile::new(
            Version::parse(version).unwrap(),
            OptimizerSettings {
                enabled: true,
                runs,
            },
        )
    }

    #[test]
    fn resolves_known_releases() {
        assert_eq!(resolve_version("0.8.11").unwrap(), Version::new(0, 8, 11));
        assert_eq!(resolve_version("0.4.11").unwrap(), Version::new(0, 4, 11));
        assert_eq!(resolve_version("0.7.6").unwrap(), Version::new(0, 7, 6));
    }

    #[test]
    fn rejects_unreleased_versions() {
        for version in ["0.4.10", "0.7.7", "0.9.0", "1.0.0", "0.8.11-nightly"] {
            assert!(
                matches!(
                    resolve_version(version),
                    Err(ResolutionError::Unsupported { .. })
                ),
                "{version} should be unsupported"
            );
        }
    }

    #[test]
    fn rejects_malformed_versions() {
        for version in ["", "0.8", "latest", "^0.8.0"] {
            assert!(matches!(
                resolve_version(version),
                Err(ResolutionError::Malformed { .. })
            ));
        }
    }

    #[test]
    fn negative_runs_are_a_validation_error() {
        let raw = RawCompiler {
            version: "0.8.11".into(),
            settings: RawSettings {
                optimizer: RawOptimizer {
                    enabled: true,
                    runs: Some(-1),
                },
            },
        };
        let mut errors = vec![];
        let profile = CompilerProfile::from_raw(&raw, "solidity.compilers[0]", &mut errors);
        assert!(matches!(profile, Ok(None)));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "solidity.compilers[0].settings.optimizer.runs");
    }

    #[test]
    fn omitted_runs_use_the_default() {
        let raw = RawCompiler {
            version: "0.8.11".into(),
            settings: RawSettings::default(),
        };
        let mut errors = vec![];
        let profile = CompilerProfile::from_raw(&raw, "solidity.compilers[0]", &mut errors)
            .unwrap()
            .unwrap();
        assert!(errors.is_empty());
        assert_eq!(profile.optimizer, OptimizerSettings::default());
    }

    #[test]
    fn declaration_order_decides_between_matching_profiles() {
        let solidity = SolidityConfig {
            compilers: vec![profile("0.8.4", 1), profile("0.8.11", 2), profile("0.6.12", 3)],
            overrides: BTreeMap::new(),
        };
        let req = VersionReq::parse("^0.8.0").unwrap();
        assert_eq!(solidity.compiler_for(&req).unwrap().optimizer.runs, 1);

        let req = VersionReq::parse(">=0.8.10").unwrap();
        assert_eq!(solidity.compiler_for(&req).unwrap().optimizer.runs, 2);

        let req = VersionReq::parse("^0.5.0").unwrap();
        assert!(solidity.compiler_for(&req).is_none());
    }

    #[test]
    fn overrides_win_for_their_source() {
        let mut overrides = BTreeMap::new();
        overrides.insert("contracts/Legacy.sol".to_string(), profile("0.6.12", 9));
        let solidity = SolidityConfig {
            compilers: vec![profile("0.8.11", 200)],
            overrides,
        };
        let req = VersionReq::parse("^0.8.0").unwrap();
        assert_eq!(
            solidity
                .compiler_for_source("contracts/Legacy.sol", &req)
                .unwrap()
                .version,
            Version::new(0, 6, 12)
        );
        assert_eq!(
            solidity
                .compiler_for_source("contracts/Token.sol", &req)
                .unwrap()
                .version,
            Version::new(0, 8, 11)
        );
        assert_eq!(
            solidity.versions(),
            vec![&Version::new(0, 6, 12), &Version::new(0, 8, 11)]
        );
    }
}
