use chrono::{SecondsFormat, Utc};
use log;
use serde::Deserialize;
use serde_json as json;

use crate::curl;
use crate::documents::BlueskyCredentials;

pub const DEFAULT_SERVICE: &str = "https://bsky.social";

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Session {
    access_jwt: String,
    did: String,
}

pub struct Client {
    service: String,
    session: Session,
}

fn xrpc(service: &str, method: &str) -> String {
    format!("{}/xrpc/{}", service.trim_end_matches('/'), method)
}

impl Client {
    pub fn login(creds: &BlueskyCredentials) -> Result<Client, String> {
        let service = creds
            .service
            .clone()
            .unwrap_or_else(|| DEFAULT_SERVICE.to_string());
        let body = json::json!({
            "identifier": creds.username,
            "password": creds.password,
        });
        let resp = curl::post(
            &xrpc(&service, "com.atproto.server.createSession"),
            &[],
            "application/json",
            body.to_string().as_bytes(),
        )
        .map_err(|e| format!("Bluesky login as {} failed: {}", creds.username, e))?;
        let session: Session =
            json::from_slice(&resp).map_err(|e| format!("Unexpected login response: {}", e))?;
        log::debug!("logged in as {}", session.did);
        Ok(Client { service, session })
    }

    fn auth(&self) -> Vec<String> {
        vec![format!("Authorization: Bearer {}", self.session.access_jwt)]
    }

    fn upload_blob(&self, png: &[u8]) -> Result<json::Value, String> {
        let resp = curl::post(
            &xrpc(&self.service, "com.atproto.repo.uploadBlob"),
            &self.auth(),
            "image/png",
            png,
        )?;
        let value: json::Value =
            json::from_slice(&resp).map_err(|e| format!("Unexpected upload response: {}", e))?;
        match &value["blob"] {
            json::Value::Null => Err(format!("Upload response without blob: {}", value)),
            blob => Ok(blob.clone()),
        }
    }

    /// Post `text` with a single PNG image attached.
    pub fn send_image(&self, text: &str, png: &[u8], alt: &str) -> Result<(), String> {
        let blob = self.upload_blob(png)?;
        let record = post_record(text, alt, blob, &Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true));
        let body = json::json!({
            "repo": self.session.did,
            "collection": "app.bsky.feed.post",
            "record": record,
        });
        let resp = curl::post(
            &xrpc(&self.service, "com.atproto.repo.createRecord"),
            &self.auth(),
            "application/json",
            body.to_string().as_bytes(),
        )?;
        log::debug!("posted: {}", String::from_utf8_lossy(&resp));
        Ok(())
    }
}

fn post_record(text: &str, alt: &str, blob: json::Value, created_at: &str) -> json::Value {
    json::json!({
        "$type": "app.bsky.feed.post",
        "text": text,
        "createdAt": created_at,
        "embed": {
            "$type": "app.bsky.embed.images",
            "images": [{"alt": alt, "image": blob}],
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn xrpc_urls() {
        assert_eq!(
            xrpc("https://bsky.social", "com.atproto.server.createSession"),
            "https://bsky.social/xrpc/com.atproto.server.createSession"
        );
        assert_eq!(
            xrpc("https://pds.example.com/", "com.atproto.repo.uploadBlob"),
            "https://pds.example.com/xrpc/com.atproto.repo.uploadBlob"
        );
    }

    #[test]
    fn record_shape() {
        let blob = json!({"$type": "blob", "ref": {"$link": "bafk"}, "mimeType": "image/png", "size": 3});
        let rec = post_record("hi", "a plot", blob.clone(), "2024-05-01T12:00:00.000Z");
        assert_eq!(rec["$type"], "app.bsky.feed.post");
        assert_eq!(rec["text"], "hi");
        assert_eq!(rec["createdAt"], "2024-05-01T12:00:00.000Z");
        assert_eq!(rec["embed"]["$type"], "app.bsky.embed.images");
        assert_eq!(rec["embed"]["images"][0]["alt"], "a plot");
        assert_eq!(rec["embed"]["images"][0]["image"], blob);
    }

    #[test]
    fn session_parse() {
        let s: Session = json::from_str(r#"{"accessJwt":"a","refreshJwt":"r","did":"did:plc:x","handle":"h"}"#).unwrap();
        assert_eq!(s.did, "did:plc:x");
        assert_eq!(s.access_jwt, "a");
    }
}
