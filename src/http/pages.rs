use std::fmt::Write;

use time::macros::format_description;
use time::{OffsetDateTime, UtcOffset};

use crate::domain::media::MediaRecord;

/// Gallery times are shown in UTC+8.
const DISPLAY_OFFSET_HOURS: i8 = 8;

const LANDING_PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>Telegraph image relay</title>
  <style>
    body { margin: 0; min-height: 100vh; display: flex; align-items: center; justify-content: center; font-family: sans-serif; }
    .background { position: fixed; inset: 0; background-size: cover; background-position: center; z-index: -1; transition: opacity 1s ease-in-out; }
    .card { background: rgba(255, 255, 255, 0.85); border-radius: 10px; box-shadow: 0 4px 8px rgba(0, 0, 0, 0.2); padding: 20px; width: 90%; max-width: 420px; text-align: center; }
    .formats { margin-top: 16px; display: none; }
    .formats button { margin: 0 4px; }
    textarea { width: 100%; margin-top: 12px; display: none; resize: none; }
    #status { min-height: 1.2em; margin-top: 8px; font-size: 14px; }
  </style>
</head>
<body>
  <div class="background" id="background"></div>
  <div class="card">
    <h2>Telegraph image relay</h2>
    <form id="uploadForm" action="/upload" method="post" enctype="multipart/form-data">
      <input id="fileInput" name="file" type="file" accept="image/gif,image/jpeg,image/jpg,image/png,video/mp4" multiple>
    </form>
    <div id="status"></div>
    <div class="formats" id="formats">
      <button type="button" data-format="url">URL</button>
      <button type="button" data-format="bbcode">BBCode</button>
      <button type="button" data-format="markdown">Markdown</button>
    </div>
    <textarea id="fileLink" rows="4" readonly></textarea>
  </div>
  <script>
    const uploaded = [];
    const statusLine = document.getElementById('status');
    const fileLink = document.getElementById('fileLink');

    function showLinks(text) {
      fileLink.value = text;
      fileLink.style.display = 'block';
      document.getElementById('formats').style.display = 'block';
    }

    async function uploadFile(file) {
      statusLine.textContent = 'Uploading ' + file.name + '...';
      const form = new FormData();
      form.append('file', file, file.name);
      try {
        const response = await fetch('/upload', { method: 'POST', body: form });
        const body = await response.json().catch(() => ({ error: 'Upload failed' }));
        if (!response.ok || body.error) {
          statusLine.textContent = body.error || 'Upload failed';
          return;
        }
        uploaded.push(body.data);
        showLinks(uploaded.join('\n\n'));
        statusLine.textContent = 'Uploaded';
      } catch (err) {
        statusLine.textContent = 'Upload failed';
      }
    }

    document.getElementById('fileInput').addEventListener('change', async (event) => {
      for (const file of event.target.files) {
        await uploadFile(file);
      }
    });

    document.addEventListener('paste', (event) => {
      for (const item of event.clipboardData.items) {
        if (item.kind === 'file') {
          uploadFile(item.getAsFile());
          break;
        }
      }
    });

    document.querySelectorAll('[data-format]').forEach((button) => {
      button.addEventListener('click', () => {
        const links = uploaded.map((url) => url.trim()).filter((url) => url !== '');
        const format = button.getAttribute('data-format');
        const text = links.map((url) => {
          if (format === 'bbcode') return '[img]' + url + '[/img]';
          if (format === 'markdown') return '![image](' + url + ')';
          return url;
        }).join('\n\n');
        showLinks(text);
        navigator.clipboard && navigator.clipboard.writeText(text);
      });
    });

    fetch('/bing-images')
      .then((response) => response.json())
      .then((body) => {
        const images = (body.data || []).map((image) => image.url);
        if (images.length === 0) return;
        const background = document.getElementById('background');
        let index = 0;
        background.style.backgroundImage = 'url(' + images[0] + ')';
        setInterval(() => {
          index = (index + 1) % images.length;
          background.style.backgroundImage = 'url(' + images[index] + ')';
        }, 5000);
      })
      .catch(() => {});
  </script>
</body>
</html>
"#;

const GALLERY_HEAD: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>Gallery</title>
  <style>
    body { font-family: sans-serif; margin: 0; padding: 20px; background: #f4f4f4; }
    .header { position: sticky; top: 0; display: flex; justify-content: space-between; align-items: center; background: #fff; padding: 12px 16px; border-radius: 6px; box-shadow: 0 1px 3px rgba(0, 0, 0, 0.1); z-index: 10; }
    .hidden { display: none; }
    .gallery { display: grid; grid-template-columns: repeat(auto-fill, minmax(200px, 1fr)); gap: 16px; margin-top: 16px; }
    .item { position: relative; background: #fff; border-radius: 6px; overflow: hidden; height: 200px; cursor: pointer; border: 3px solid transparent; }
    .item.selected { border-color: #dc3545; }
    .item img, .item video { width: 100%; height: 100%; object-fit: cover; }
    .media-type { position: absolute; top: 6px; left: 6px; background: rgba(0, 0, 0, 0.6); color: #fff; padding: 2px 6px; border-radius: 3px; font-size: 12px; }
    .upload-time { position: absolute; bottom: 0; left: 0; right: 0; background: rgba(0, 0, 0, 0.6); color: #fff; font-size: 12px; padding: 4px; display: none; }
    .item.selected .upload-time { display: block; }
    .delete-button { background: #dc3545; color: #fff; border: none; border-radius: 4px; padding: 6px 12px; cursor: pointer; }
    .footer { text-align: center; color: #888; margin: 24px 0; }
  </style>
  <script>
    const selectedKeys = new Set();

    function toggleSelection(item) {
      const key = item.getAttribute('data-key');
      if (item.classList.toggle('selected')) {
        selectedKeys.add(key);
      } else {
        selectedKeys.delete(key);
      }
      document.getElementById('selected-count').textContent = selectedKeys.size;
      document.getElementById('selection').classList.toggle('hidden', selectedKeys.size === 0);
    }

    async function deleteSelected() {
      if (selectedKeys.size === 0) return;
      const response = await fetch('/delete-images', {
        method: 'POST',
        headers: { 'Content-Type': 'application/json' },
        body: JSON.stringify(Array.from(selectedKeys)),
      });
      if (response.ok) {
        location.reload();
      } else {
        alert('Delete failed');
      }
    }
  </script>
</head>
<body>
"#;

pub fn landing() -> &'static str {
    LANDING_PAGE
}

/// Renders the admin gallery for `records`, which arrive newest first.
pub fn gallery(records: &[MediaRecord]) -> String {
    let mut html = String::with_capacity(GALLERY_HEAD.len() + records.len() * 320);
    html.push_str(GALLERY_HEAD);

    let _ = write!(
        html,
        r#"  <div class="header">
    <span>{} media files</span>
    <span id="selection" class="hidden">Selected: <span id="selected-count">0</span>
      <button class="delete-button" onclick="deleteSelected()">Delete selected</button>
    </span>
  </div>
  <div class="gallery">
"#,
        records.len()
    );

    for record in records {
        let key = escape(&record.key);
        let url = escape(&record.url);
        let uploaded_at = escape(&format_timestamp(record.timestamp));

        if record.is_video() {
            let _ = write!(
                html,
                r#"    <div class="item" data-key="{key}" onclick="toggleSelection(this)">
      <div class="media-type">Video</div>
      <video src="{url}" preload="metadata" controls></video>
      <div class="upload-time">Uploaded {uploaded_at}</div>
    </div>
"#
            );
        } else {
            let _ = write!(
                html,
                r#"    <div class="item" data-key="{key}" onclick="toggleSelection(this)">
      <img src="{url}" alt="" loading="lazy">
      <div class="upload-time">Uploaded {uploaded_at}</div>
    </div>
"#
            );
        }
    }

    html.push_str("  </div>\n  <div class=\"footer\">End of gallery</div>\n</body>\n</html>\n");
    html
}

/// `YYYY-MM-DD HH:MM:SS` in UTC+8; the raw value if it is out of range.
pub fn format_timestamp(millis: i64) -> String {
    let format = format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
    let offset = UtcOffset::from_hms(DISPLAY_OFFSET_HOURS, 0, 0).unwrap_or(UtcOffset::UTC);

    OffsetDateTime::from_unix_timestamp_nanos(i128::from(millis) * 1_000_000)
        .ok()
        .and_then(|moment| moment.to_offset(offset).format(&format).ok())
        .unwrap_or_else(|| millis.to_string())
}

fn escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
