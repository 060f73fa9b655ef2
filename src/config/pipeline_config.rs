// ==========================================
// NAF 事故统计系统 - 运行配置
// ==========================================
// 加载顺序: NAF_RISK_STATS_CONFIG 环境变量 → 用户配置目录 → 内置默认
// 格式: JSON，所有字段可省略
// ==========================================

use crate::domain::types::Category;
use crate::engine::aggregator::HierarchyKeys;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

pub const CONFIG_ENV_VAR: &str = "NAF_RISK_STATS_CONFIG";
const CONFIG_DIR_NAME: &str = "naf-risk-stats";
const CONFIG_FILE_NAME: &str = "config.json";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件读取失败 ({path}): {message}")]
    Read { path: String, message: String },

    #[error("配置文件格式错误 ({path}): {message}")]
    Parse { path: String, message: String },

    #[error("配置值无效 ({key}): {message}")]
    Invalid { key: String, message: String },
}

/// 数据来源说明（写入输出元数据）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceInfo {
    pub description: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourcesConfig {
    pub accident: SourceInfo,
    pub disease: SourceInfo,
    pub commuting: SourceInfo,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            accident: SourceInfo {
                description: "Ameli - Risque AT par CTN x NAF 2023".to_string(),
                url: "https://assurance-maladie.ameli.fr/sites/default/files/2023_Risque-AT-CTN-x-NAF_serie%20annuelle.xlsx".to_string(),
            },
            disease: SourceInfo {
                description: "Ameli - Risque MP par CTN x NAF 2023".to_string(),
                url: "https://assurance-maladie.ameli.fr/sites/default/files/2023_Risque-MP-par-CTN-x-NAF_serie-annuelle.xlsx".to_string(),
            },
            commuting: SourceInfo {
                description: "Ameli, Fiches NAF 2023 (PDF) + main-d'oeuvre AT".to_string(),
                url: "https://assurance-maladie.ameli.fr/etudes-et-donnees/sinistralite-at-mp-par-code-naf".to_string(),
            },
        }
    }
}

impl SourcesConfig {
    pub fn for_category(&self, category: Category) -> &SourceInfo {
        match category {
            Category::OccupationalAccident => &self.accident,
            Category::OccupationalDisease => &self.disease,
            Category::Commuting => &self.commuting,
        }
    }
}

// ==========================================
// PipelineConfig - 一次完整刷新的配置
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// AT 表（.xlsx/.xls/.csv）
    pub accident_workbook: PathBuf,
    /// MP 表
    pub disease_workbook: PathBuf,
    /// 文档文本导出目录（NAF_<code>.json），缺省则跳过文档相关输出
    pub document_dir: Option<PathBuf>,
    pub output_dir: PathBuf,
    /// 表头所在行（1 基），数据从下一行开始
    pub header_row: usize,
    /// 同时处理的文档数上限
    pub document_concurrency: usize,
    pub mid_prefix_len: usize,
    pub coarse_prefix_len: usize,
    pub sources: SourcesConfig,
    /// 校验摘要中抽查的细码
    pub spot_check_code: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            accident_workbook: PathBuf::from("at-by-ctn-naf.xlsx"),
            disease_workbook: PathBuf::from("mp-by-ctn-naf.xlsx"),
            document_dir: None,
            output_dir: PathBuf::from("data"),
            header_row: 4,
            document_concurrency: 8,
            mid_prefix_len: 4,
            coarse_prefix_len: 2,
            sources: SourcesConfig::default(),
            spot_check_code: "4711D".to_string(),
        }
    }
}

impl PipelineConfig {
    /// 从 JSON 文件加载
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        let config: PipelineConfig =
            serde_json::from_str(&raw).map_err(|e| ConfigError::Parse {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
        config.validate()?;
        info!(path = %path.display(), "已加载运行配置");
        Ok(config)
    }

    /// 按默认查找顺序解析配置
    pub fn resolve() -> Result<Self, ConfigError> {
        match Self::default_config_path() {
            Some(path) => Self::load(path),
            None => {
                debug!("未找到配置文件，使用内置默认配置");
                Ok(Self::default())
            }
        }
    }

    /// 获取默认配置文件路径（不存在时返回 None）
    pub fn default_config_path() -> Option<PathBuf> {
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            let trimmed = path.trim();
            if !trimmed.is_empty() {
                return Some(PathBuf::from(trimmed));
            }
        }

        dirs::config_dir()
            .map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
            .filter(|path| path.exists())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.header_row == 0 {
            return Err(ConfigError::Invalid {
                key: "header_row".to_string(),
                message: "表头行号从 1 开始".to_string(),
            });
        }
        if self.document_concurrency == 0 {
            return Err(ConfigError::Invalid {
                key: "document_concurrency".to_string(),
                message: "并发数必须大于 0".to_string(),
            });
        }
        if self.coarse_prefix_len == 0 || self.coarse_prefix_len >= self.mid_prefix_len {
            return Err(ConfigError::Invalid {
                key: "coarse_prefix_len".to_string(),
                message: format!(
                    "粗码长度 {} 必须大于 0 且小于中码长度 {}",
                    self.coarse_prefix_len, self.mid_prefix_len
                ),
            });
        }
        Ok(())
    }

    pub fn hierarchy_keys(&self) -> HierarchyKeys {
        HierarchyKeys {
            mid_len: self.mid_prefix_len,
            coarse_len: self.coarse_prefix_len,
        }
    }

    pub fn output_path(&self, category: Category) -> PathBuf {
        self.output_dir
            .join(format!("{}-data.json", category.short_code()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = PipelineConfig::default();
        assert_eq!(config.header_row, 4);
        assert_eq!(config.document_concurrency, 8);
        assert_eq!(config.hierarchy_keys(), HierarchyKeys { mid_len: 4, coarse_len: 2 });
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_partial_file_fills_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"output_dir": "/tmp/out", "document_concurrency": 2}}"#).unwrap();

        let config = PipelineConfig::load(file.path()).unwrap();
        assert_eq!(config.output_dir, PathBuf::from("/tmp/out"));
        assert_eq!(config.document_concurrency, 2);
        assert_eq!(config.spot_check_code, "4711D");
        assert_eq!(
            config.output_path(Category::Commuting),
            PathBuf::from("/tmp/out/trajet-data.json")
        );
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"header_row": 0}}"#).unwrap();
        assert!(matches!(
            PipelineConfig::load(file.path()),
            Err(ConfigError::Invalid { .. })
        ));
    }

    #[test]
    fn test_load_malformed_json() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{{not json").unwrap();
        assert!(matches!(
            PipelineConfig::load(file.path()),
            Err(ConfigError::Parse { .. })
        ));
    }
}
