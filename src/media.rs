//! The media section of a title page: tab headers and per-tab content.

use serde::{Deserialize, Serialize};

use crate::tmdb::images::{image_url, ImageSize};
use crate::tmdb::models::{ImageItem, Video};
use crate::tmdb::Images;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaTab {
    #[default]
    Popular,
    Videos,
    Backdrops,
    Posters,
}

impl MediaTab {
    pub const ALL: [MediaTab; 4] = [
        MediaTab::Popular,
        MediaTab::Videos,
        MediaTab::Backdrops,
        MediaTab::Posters,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            MediaTab::Popular => "Most Popular",
            MediaTab::Videos => "Videos",
            MediaTab::Backdrops => "Backdrops",
            MediaTab::Posters => "Posters",
        }
    }
}

/// Links for one YouTube video.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrailerLink {
    pub key: String,
    pub embed_url: String,
    pub watch_url: String,
}

impl TrailerLink {
    pub fn new(key: &str) -> Self {
        Self {
            key: key.to_string(),
            embed_url: format!("https://www.youtube.com/embed/{key}"),
            watch_url: youtube_watch_url(key),
        }
    }
}

pub fn youtube_watch_url(key: &str) -> String {
    format!("https://youtube.com/watch?v={key}")
}

pub fn youtube_thumbnail(key: &str) -> String {
    format!("https://img.youtube.com/vi/{key}/hqdefault.jpg")
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VideoTile {
    pub id: String,
    pub name: String,
    pub thumbnail: String,
    pub watch_url: String,
}

impl From<&Video> for VideoTile {
    fn from(video: &Video) -> Self {
        Self {
            id: video.id.clone(),
            name: video.name.clone(),
            thumbnail: youtube_thumbnail(&video.key),
            watch_url: youtube_watch_url(&video.key),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageTile {
    pub file_path: String,
    pub url: String,
}

impl From<&ImageItem> for ImageTile {
    fn from(image: &ImageItem) -> Self {
        Self {
            file_path: image.file_path.clone(),
            url: image_url(Some(&image.file_path), ImageSize::W500),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TabHeader {
    pub key: MediaTab,
    pub label: &'static str,
    /// Only set when the tab has something to count.
    pub count: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "tab", rename_all = "lowercase")]
pub enum TabContent {
    Popular {
        video: Option<VideoTile>,
        backdrop: Option<ImageTile>,
    },
    Videos {
        items: Vec<VideoTile>,
    },
    Backdrops {
        items: Vec<ImageTile>,
    },
    Posters {
        items: Vec<ImageTile>,
    },
}

pub struct MediaTabs<'a> {
    videos: &'a [Video],
    images: &'a Images,
}

impl<'a> MediaTabs<'a> {
    pub fn new(videos: &'a [Video], images: &'a Images) -> Self {
        Self { videos, images }
    }

    pub fn headers(&self) -> Vec<TabHeader> {
        MediaTab::ALL
            .iter()
            .map(|tab| {
                let len = match tab {
                    MediaTab::Popular => 0,
                    MediaTab::Videos => self.videos.len(),
                    MediaTab::Backdrops => self.images.backdrops.len(),
                    MediaTab::Posters => self.images.posters.len(),
                };
                TabHeader {
                    key: *tab,
                    label: tab.label(),
                    count: (len > 0).then_some(len),
                }
            })
            .collect()
    }

    pub fn content(&self, tab: MediaTab) -> TabContent {
        match tab {
            MediaTab::Popular => TabContent::Popular {
                video: self.videos.first().map(VideoTile::from),
                backdrop: self.images.backdrops.first().map(ImageTile::from),
            },
            MediaTab::Videos => TabContent::Videos {
                items: self.videos.iter().map(VideoTile::from).collect(),
            },
            MediaTab::Backdrops => TabContent::Backdrops {
                items: self.images.backdrops.iter().map(ImageTile::from).collect(),
            },
            MediaTab::Posters => TabContent::Posters {
                items: self.images.posters.iter().map(ImageTile::from).collect(),
            },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MediaSection {
    pub tabs: Vec<TabHeader>,
    pub active: MediaTab,
    pub content: TabContent,
}

impl MediaSection {
    pub fn build(videos: &[Video], images: &Images, active: MediaTab) -> Self {
        let tabs = MediaTabs::new(videos, images);
        Self {
            tabs: tabs.headers(),
            active,
            content: tabs.content(active),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fixtures() -> (Vec<Video>, Images) {
        let videos: Vec<Video> = serde_json::from_value(json!([
            { "id": "v1", "key": "k1", "name": "Trailer", "site": "YouTube", "type": "Trailer" },
            { "id": "v2", "key": "k2", "name": "Clip", "site": "YouTube", "type": "Clip" }
        ]))
        .expect("videos");
        let images: Images = serde_json::from_value(json!({
            "backdrops": [{ "file_path": "/b1.jpg" }, { "file_path": "/b2.jpg" }, { "file_path": "/b3.jpg" }],
            "posters": [{ "file_path": "/p1.jpg" }]
        }))
        .expect("images");
        (videos, images)
    }

    #[test]
    fn headers_count_only_non_empty_tabs() {
        let (videos, images) = fixtures();
        let headers = MediaTabs::new(&videos, &images).headers();
        let counts: Vec<Option<usize>> = headers.iter().map(|h| h.count).collect();
        assert_eq!(counts, vec![None, Some(2), Some(3), Some(1)]);
        assert_eq!(headers[0].label, "Most Popular");

        let empty = Images::default();
        let headers = MediaTabs::new(&[], &empty).headers();
        assert!(headers.iter().all(|h| h.count.is_none()));
    }

    #[test]
    fn popular_tab_shows_first_video_and_backdrop() {
        let (videos, images) = fixtures();
        match MediaTabs::new(&videos, &images).content(MediaTab::Popular) {
            TabContent::Popular { video, backdrop } => {
                let video = video.expect("video");
                assert_eq!(video.thumbnail, "https://img.youtube.com/vi/k1/hqdefault.jpg");
                assert_eq!(video.watch_url, "https://youtube.com/watch?v=k1");
                assert_eq!(backdrop.expect("backdrop").file_path, "/b1.jpg");
            }
            other => panic!("unexpected content {other:?}"),
        }
    }

    #[test]
    fn each_tab_renders_its_own_subset() {
        let (videos, images) = fixtures();
        let tabs = MediaTabs::new(&videos, &images);

        match tabs.content(MediaTab::Videos) {
            TabContent::Videos { items } => assert_eq!(items.len(), 2),
            other => panic!("unexpected content {other:?}"),
        }
        match tabs.content(MediaTab::Backdrops) {
            TabContent::Backdrops { items } => {
                let paths: Vec<&str> = items.iter().map(|i| i.file_path.as_str()).collect();
                assert_eq!(paths, vec!["/b1.jpg", "/b2.jpg", "/b3.jpg"]);
            }
            other => panic!("unexpected content {other:?}"),
        }
        match tabs.content(MediaTab::Posters) {
            TabContent::Posters { items } => {
                assert_eq!(items.len(), 1);
                assert_eq!(items[0].url, "https://image.tmdb.org/t/p/w500/p1.jpg");
            }
            other => panic!("unexpected content {other:?}"),
        }
    }

    #[test]
    fn popular_tab_is_empty_without_media() {
        let empty = Images::default();
        let content = MediaTabs::new(&[], &empty).content(MediaTab::Popular);
        assert_eq!(
            content,
            TabContent::Popular {
                video: None,
                backdrop: None
            }
        );
    }
}
