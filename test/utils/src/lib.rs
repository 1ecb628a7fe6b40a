use std::env;

pub fn insta_snapshot<F: FnOnce()>(f: F) {
    let mut settings = insta::Settings::clone_current();
    let snapshot_path = env::current_dir().unwrap().join("./test/snapshots");
    settings.set_snapshot_path(snapshot_path);
    settings.bind(f);
}

/// A chat completions body as returned by an OpenAI compatible endpoint.
pub fn completion_fixture(content: &str) -> String {
    return serde_json::json!({
        "id": "chatcmpl-1",
        "object": "chat.completion",
        "model": "meta-llama/Llama-3.2-3B-Instruct",
        "choices": [{
            "index": 0,
            "finish_reason": "stop",
            "message": {
                "role": "assistant",
                "content": content,
            },
        }],
    })
    .to_string();
}

/// A successful Firebase `accounts:signInWithPassword` body.
pub fn sign_in_fixture(email: &str) -> String {
    return serde_json::json!({
        "kind": "identitytoolkit#VerifyPasswordResponse",
        "localId": "u-123",
        "email": email,
        "displayName": "",
        "idToken": "id-token",
        "registered": true,
        "refreshToken": "refresh-token",
        "expiresIn": "3600",
    })
    .to_string();
}

/// A Firebase error body for rejected credentials.
pub fn sign_in_error_fixture(message: &str) -> String {
    return serde_json::json!({
        "error": {
            "code": 400,
            "message": message,
            "errors": [{
                "message": message,
                "domain": "global",
                "reason": "invalid",
            }],
        },
    })
    .to_string();
}
