use crate::{
    config::Config,
    error::{AppError, Result},
    models::media::*,
    services::{store::Store, PostService},
};
use chrono::Utc;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

#[derive(Clone)]
pub struct MediaService {
    store: Store<Media>,
    posts: PostService,
    upload_dir: PathBuf,
}

impl MediaService {
    pub fn new(config: &Config, posts: PostService) -> Self {
        Self {
            store: Store::new("Media"),
            posts,
            upload_dir: config.upload_dir.clone(),
        }
    }

    /// 上传媒体文件并关联到帖子
    ///
    /// Checks run in a fixed order: media type, post id, post existence,
    /// then the file itself. Nothing touches the disk until all pass.
    pub async fn upload(&self, uploader_id: u64, upload: MediaUpload) -> Result<Media> {
        let media_type: MediaType = upload
            .media_type
            .as_deref()
            .unwrap_or_default()
            .parse()
            .map_err(|_| AppError::bad_request("Invalid media type"))?;

        let post_id = upload
            .post_id
            .as_deref()
            .and_then(|raw| raw.trim().parse::<i64>().ok())
            .filter(|id| *id > 0)
            .ok_or_else(|| AppError::not_found("Post"))? as u64;
        self.posts.ensure_exists(post_id)?;

        let data = upload
            .data
            .filter(|bytes| !bytes.is_empty())
            .ok_or_else(|| AppError::FileUpload("File is required".to_string()))?;

        let original = upload.filename.as_deref().unwrap_or_default();
        let media_id = self.store.reserve_id();
        let filename = format!("{}_{}", media_id, sanitize_filename(original));
        let path = self.upload_dir.join(&filename);

        debug!("Writing {} bytes to {}", data.len(), path.display());
        write_file(&self.upload_dir, &path, &data).await?;

        let media = Media {
            media_id,
            media_type,
            post_id,
            uploader_id,
            filename: filename.clone(),
            url: format!("/uploads/{}", filename),
            size: data.len(),
            created_at: Utc::now(),
        };
        self.store.put(media.clone());

        info!(
            "Media {} ({:?}) uploaded for post {} by user {}",
            media_id, media_type, post_id, uploader_id
        );
        Ok(media)
    }
}

async fn write_file(dir: &Path, path: &Path, data: &[u8]) -> Result<()> {
    let written = async {
        tokio::fs::create_dir_all(dir).await?;
        tokio::fs::write(path, data).await
    }
    .await;

    written.map_err(|e| {
        error!("Failed to save upload to {}: {}", path.display(), e);
        AppError::Internal("Cannot save file".to_string())
    })
}

/// Keep only the final path component and a conservative character set.
pub fn sanitize_filename(raw: &str) -> String {
    let base = raw
        .rsplit(|c: char| c == '/' || c == '\\')
        .next()
        .unwrap_or_default();

    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();

    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::post::CreatePostRequest;
    use tempfile::TempDir;

    fn setup() -> (MediaService, u64, TempDir) {
        let dir = TempDir::new().unwrap();
        let config = Config {
            upload_dir: dir.path().join("uploads"),
            ..Config::default()
        };
        let posts = PostService::new(&config);
        let post = posts
            .create_post(
                1,
                CreatePostRequest {
                    content: "with picture".to_string(),
                    media_ids: vec![],
                },
            )
            .unwrap();
        (MediaService::new(&config, posts), post.post_id, dir)
    }

    fn upload(media_type: &str, post_id: &str, data: &[u8]) -> MediaUpload {
        MediaUpload {
            media_type: Some(media_type.to_string()),
            post_id: Some(post_id.to_string()),
            filename: Some("cat.png".to_string()),
            data: Some(data.to_vec()),
        }
    }

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_filename("C:\\photos\\me.jpg"), "me.jpg");
        assert_eq!(sanitize_filename("my photo (1).png"), "my_photo__1_.png");
        assert_eq!(sanitize_filename(".."), "upload");
        assert_eq!(sanitize_filename(""), "upload");
    }

    #[tokio::test]
    async fn test_upload_writes_file() {
        let (service, post_id, dir) = setup();

        let media = service
            .upload(1, upload("image", &post_id.to_string(), b"png-bytes"))
            .await
            .unwrap();

        assert_eq!(media.media_type, MediaType::Image);
        assert_eq!(media.filename, format!("{}_cat.png", media.media_id));
        let saved = std::fs::read(dir.path().join("uploads").join(&media.filename)).unwrap();
        assert_eq!(saved, b"png-bytes");
        assert_eq!(service.store.get(media.media_id).unwrap(), media);
    }

    #[tokio::test]
    async fn test_validation_order() {
        let (service, post_id, _dir) = setup();
        let post = post_id.to_string();

        // bad type wins over a bad post id
        let err = service.upload(1, upload("audio", "abc", b"x")).await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));

        for bad_id in ["abc", "0", "-4", "999"] {
            let err = service.upload(1, upload("video", bad_id, b"x")).await.unwrap_err();
            assert!(matches!(err, AppError::NotFound(_)), "post id {}", bad_id);
        }

        let err = service.upload(1, upload("video", &post, b"")).await.unwrap_err();
        assert_eq!(err.status(), axum::http::StatusCode::BAD_REQUEST);

        let mut missing = upload("video", &post, b"x");
        missing.data = None;
        assert!(service.upload(1, missing).await.is_err());
    }

    #[tokio::test]
    async fn test_write_failure_is_internal() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, b"file").unwrap();

        let config = Config {
            upload_dir: blocker,
            ..Config::default()
        };
        let posts = PostService::new(&config);
        let post = posts
            .create_post(
                1,
                CreatePostRequest {
                    content: "x".to_string(),
                    media_ids: vec![],
                },
            )
            .unwrap();
        let service = MediaService::new(&config, posts);

        let err = service
            .upload(1, upload("image", &post.post_id.to_string(), b"data"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Internal(ref msg) if msg == "Cannot save file"));
    }
}
