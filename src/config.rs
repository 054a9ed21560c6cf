use anyhow::{anyhow, Result};
use std::env;

/// Where uploaded doctor portraits are stored.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StorageBackend {
    Cloudinary,
    S3,
}

impl TryFrom<String> for StorageBackend {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.trim().to_lowercase().as_str() {
            "cloudinary" => Ok(StorageBackend::Cloudinary),
            "s3" => Ok(StorageBackend::S3),
            other => Err(format!("Invalid storage backend: {}", other)),
        }
    }
}

impl std::fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageBackend::Cloudinary => write!(f, "cloudinary"),
            StorageBackend::S3 => write!(f, "s3"),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct CloudinaryConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
    pub api_url: String,
}

#[derive(Clone, Debug, Default)]
pub struct S3Config {
    pub bucket_name: String,
    pub region: String,
    pub access_key_id: String,
    pub secret_access_key: String,
    pub endpoint_url: Option<String>,
    /// Base URL under which stored objects are publicly reachable
    pub public_url: Option<String>,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub server_address: String,
    pub storage_backend: StorageBackend,
    pub cloudinary: CloudinaryConfig,
    pub s3: S3Config,
    pub upload_folder: String,
    pub allowed_image_types: Vec<String>,
    pub max_image_size_mb: u64,
}

pub const DEFAULT_UPLOAD_FOLDER: &str = "medway/doctors";
pub const DEFAULT_CLOUDINARY_API_URL: &str = "https://api.cloudinary.com";
pub const DEFAULT_MAX_IMAGE_SIZE_MB: u64 = 10;
pub const MAX_IMAGE_SIZE_LIMIT_MB: u64 = 1024;

impl Config {
    /// Reads the process environment (and `.env`, when present) and validates it.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let server_address = match (env::var("SERVER_ADDRESS").ok(), env::var("PORT").ok()) {
            (Some(address), _) if !address.trim().is_empty() => address,
            (_, Some(port)) => {
                let port: u16 = port
                    .trim()
                    .parse()
                    .map_err(|_| anyhow!("PORT must be a valid port number, got '{}'", port))?;
                format!("0.0.0.0:{}", port)
            }
            _ => String::new(),
        };

        let storage_backend = StorageBackend::try_from(
            env::var("STORAGE_BACKEND").unwrap_or_else(|_| "cloudinary".to_string()),
        )
        .map_err(|e| anyhow!(e))?;

        let mut problems = Vec::new();
        let max_image_size_mb = parse_max_image_size(env::var("MAX_IMAGE_SIZE_MB").ok().as_deref())
            .unwrap_or_else(|problem| {
                problems.push(problem);
                DEFAULT_MAX_IMAGE_SIZE_MB
            });

        let config = Config {
            database_url: env::var("DATABASE_URL")
                .or_else(|_| env::var("MONGO_URI"))
                .unwrap_or_default(),
            server_address,
            storage_backend,
            cloudinary: CloudinaryConfig {
                cloud_name: env::var("CLOUDINARY_CLOUD_NAME").unwrap_or_default(),
                api_key: env::var("CLOUDINARY_API_KEY").unwrap_or_default(),
                api_secret: env::var("CLOUDINARY_API_SECRET").unwrap_or_default(),
                api_url: env::var("CLOUDINARY_API_URL")
                    .unwrap_or_else(|_| DEFAULT_CLOUDINARY_API_URL.to_string()),
            },
            s3: S3Config {
                bucket_name: env::var("S3_BUCKET").unwrap_or_default(),
                region: env::var("S3_REGION").unwrap_or_else(|_| "us-east-1".to_string()),
                access_key_id: env::var("S3_ACCESS_KEY_ID").unwrap_or_default(),
                secret_access_key: env::var("S3_SECRET_ACCESS_KEY").unwrap_or_default(),
                endpoint_url: env::var("S3_ENDPOINT_URL").ok().filter(|s| !s.trim().is_empty()),
                public_url: env::var("S3_PUBLIC_URL").ok().filter(|s| !s.trim().is_empty()),
            },
            upload_folder: env::var("UPLOAD_FOLDER")
                .unwrap_or_else(|_| DEFAULT_UPLOAD_FOLDER.to_string()),
            allowed_image_types: parse_image_types(
                &env::var("ALLOWED_IMAGE_TYPES").unwrap_or_else(|_| "jpg,png,jpeg".to_string()),
            ),
            max_image_size_mb,
        };

        problems.extend(config.problems());
        if !problems.is_empty() {
            return Err(anyhow!("Invalid configuration: {}", problems.join("; ")));
        }
        Ok(config)
    }

    /// Checks every required setting and reports all problems in one error.
    pub fn validate(&self) -> Result<()> {
        let problems = self.problems();
        if problems.is_empty() {
            Ok(())
        } else {
            Err(anyhow!("Invalid configuration: {}", problems.join("; ")))
        }
    }

    fn problems(&self) -> Vec<String> {
        let mut problems = Vec::new();

        if self.database_url.trim().is_empty() {
            problems.push("DATABASE_URL is required".to_string());
        }
        if self.server_address.trim().is_empty() {
            problems.push("PORT or SERVER_ADDRESS is required".to_string());
        } else if self.server_address.parse::<std::net::SocketAddr>().is_err() {
            problems.push(format!("SERVER_ADDRESS '{}' is not a valid socket address", self.server_address));
        }

        match self.storage_backend {
            StorageBackend::Cloudinary => {
                if self.cloudinary.cloud_name.trim().is_empty() {
                    problems.push("CLOUDINARY_CLOUD_NAME is required".to_string());
                }
                if self.cloudinary.api_key.trim().is_empty() {
                    problems.push("CLOUDINARY_API_KEY is required".to_string());
                }
                if self.cloudinary.api_secret.trim().is_empty() {
                    problems.push("CLOUDINARY_API_SECRET is required".to_string());
                }
            }
            StorageBackend::S3 => {
                if self.s3.bucket_name.trim().is_empty() {
                    problems.push("S3_BUCKET is required".to_string());
                }
                if self.s3.access_key_id.trim().is_empty() {
                    problems.push("S3_ACCESS_KEY_ID is required".to_string());
                }
                if self.s3.secret_access_key.trim().is_empty() {
                    problems.push("S3_SECRET_ACCESS_KEY is required".to_string());
                }
            }
        }

        if self.allowed_image_types.is_empty() {
            problems.push("ALLOWED_IMAGE_TYPES must list at least one extension".to_string());
        }
        if self.max_image_size_mb == 0 {
            problems.push("MAX_IMAGE_SIZE_MB must be greater than zero".to_string());
        } else if self.max_image_size_mb > MAX_IMAGE_SIZE_LIMIT_MB {
            problems.push(format!(
                "MAX_IMAGE_SIZE_MB must be at most {}, got {}",
                MAX_IMAGE_SIZE_LIMIT_MB, self.max_image_size_mb
            ));
        }

        problems
    }

    pub fn max_image_size_bytes(&self) -> usize {
        usize::try_from(self.max_image_size_mb)
            .unwrap_or(usize::MAX)
            .saturating_mul(1024 * 1024)
    }

    /// True when records should be kept in the in-process store instead of Postgres.
    pub fn uses_memory_store(&self) -> bool {
        self.database_url.starts_with("memory:")
    }
}

/// Unset or blank means the default; anything else must be a whole number.
fn parse_max_image_size(raw: Option<&str>) -> std::result::Result<u64, String> {
    match raw.map(str::trim) {
        None | Some("") => Ok(DEFAULT_MAX_IMAGE_SIZE_MB),
        Some(value) => value.parse().map_err(|_| {
            format!("MAX_IMAGE_SIZE_MB must be a whole number of megabytes, got '{}'", value)
        }),
    }
}

fn parse_image_types(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().trim_start_matches('.').to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}
