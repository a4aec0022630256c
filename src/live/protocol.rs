//! Wire types for the Gemini Live `BidiGenerateContent` protocol
//!
//! Only the subset this demo exchanges is modeled: the setup message with an
//! audio-plus-transcript response configuration, realtime media chunks going
//! out, and the server-content envelope coming back.

use crate::audio::codec;
use crate::live::LiveEvent;
use serde::{Deserialize, Serialize};
use tracing::warn;

const ENDPOINT: &str = "wss://generativelanguage.googleapis.com/ws/\
google.ai.generativelanguage.v1beta.GenerativeService.BidiGenerateContent";

/// Connection URL with the API credential attached
pub fn endpoint_url(api_key: &str) -> String {
    format!("{}?key={}", ENDPOINT, api_key)
}

/// Outbound message envelope
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ClientMessage {
    Setup(Setup),
    RealtimeInput(RealtimeInput),
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Setup {
    pub model: String,
    pub generation_config: GenerationConfig,
    pub system_instruction: Content,
    /// Presence of the empty object enables the transcription stream
    pub output_audio_transcription: TranscriptionConfig,
    pub input_audio_transcription: TranscriptionConfig,
}

impl Setup {
    pub fn new(model: &str, system_prompt: &str) -> Self {
        Self {
            model: model.to_string(),
            generation_config: GenerationConfig {
                response_modalities: vec!["AUDIO".to_string()],
            },
            system_instruction: Content {
                parts: vec![Part {
                    text: Some(system_prompt.to_string()),
                    inline_data: None,
                }],
            },
            output_audio_transcription: TranscriptionConfig {},
            input_audio_transcription: TranscriptionConfig {},
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub response_modalities: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TranscriptionConfig {}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inline_data: Option<Blob>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Blob {
    pub mime_type: String,
    /// Base64-encoded payload
    pub data: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RealtimeInput {
    pub media_chunks: Vec<Blob>,
}

/// Wrap one base64 PCM frame as a realtime media chunk
pub fn audio_chunk(data: String, sample_rate: u32) -> ClientMessage {
    ClientMessage::RealtimeInput(RealtimeInput {
        media_chunks: vec![Blob {
            mime_type: format!("audio/pcm;rate={}", sample_rate),
            data,
        }],
    })
}

/// Inbound message envelope
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServerMessage {
    pub setup_complete: Option<serde_json::Value>,
    pub server_content: Option<ServerContent>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServerContent {
    pub model_turn: Option<Content>,
    pub output_transcription: Option<Transcription>,
    pub input_transcription: Option<Transcription>,
    pub interrupted: Option<bool>,
    /// Present on the wire; this demo takes no action on it
    pub turn_complete: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Transcription {
    #[serde(default)]
    pub text: String,
}

/// Flatten a server message into session events, preserving the wire order:
/// audio first, then a transcript fragment, then the interrupted flag.
///
/// Output and input transcription never share a message; output wins if a
/// malformed one carries both.
pub fn live_events(message: &ServerMessage) -> Vec<LiveEvent> {
    let mut events = Vec::new();

    if message.setup_complete.is_some() {
        events.push(LiveEvent::Opened);
    }

    let Some(content) = &message.server_content else {
        return events;
    };

    if let Some(turn) = &content.model_turn {
        for part in &turn.parts {
            if let Some(blob) = &part.inline_data {
                match codec::decode_base64(&blob.data) {
                    Ok(bytes) => events.push(LiveEvent::Audio(bytes)),
                    Err(e) => warn!("Skipping undecodable audio chunk: {}", e),
                }
            }
        }
    }

    if let Some(transcription) = &content.output_transcription {
        events.push(LiveEvent::OutputTranscript(transcription.text.clone()));
    } else if let Some(transcription) = &content.input_transcription {
        events.push(LiveEvent::InputTranscript(transcription.text.clone()));
    }

    if content.interrupted == Some(true) {
        events.push(LiveEvent::Interrupted);
    }

    events
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setup_serializes_camel_case() {
        let setup = ClientMessage::Setup(Setup::new("models/test", "Be helpful."));
        let json = serde_json::to_value(&setup).unwrap();

        assert_eq!(json["setup"]["model"], "models/test");
        assert_eq!(
            json["setup"]["generationConfig"]["responseModalities"][0],
            "AUDIO"
        );
        assert_eq!(
            json["setup"]["systemInstruction"]["parts"][0]["text"],
            "Be helpful."
        );
        assert!(json["setup"]["outputAudioTranscription"].is_object());
        assert!(json["setup"]["inputAudioTranscription"].is_object());
    }

    #[test]
    fn test_audio_chunk_wire_form() {
        let msg = audio_chunk("QUJD".to_string(), 16000);
        let json = serde_json::to_value(&msg).unwrap();

        let chunk = &json["realtimeInput"]["mediaChunks"][0];
        assert_eq!(chunk["mimeType"], "audio/pcm;rate=16000");
        assert_eq!(chunk["data"], "QUJD");
    }

    #[test]
    fn test_parse_setup_complete() {
        let msg: ServerMessage = serde_json::from_str(r#"{"setupComplete": {}}"#).unwrap();
        let events = live_events(&msg);
        assert!(matches!(events.as_slice(), [LiveEvent::Opened]));
    }

    #[test]
    fn test_parse_audio_and_transcript() {
        let b64 = codec::encode_base64(&[0, 0, 0, 64]);
        let raw = format!(
            r#"{{"serverContent":{{
                "modelTurn":{{"parts":[{{"inlineData":{{"mimeType":"audio/pcm;rate=24000","data":"{}"}}}}]}},
                "outputTranscription":{{"text":"Hel"}}
            }}}}"#,
            b64
        );
        let msg: ServerMessage = serde_json::from_str(&raw).unwrap();
        let events = live_events(&msg);

        assert_eq!(events.len(), 2);
        assert!(matches!(&events[0], LiveEvent::Audio(bytes) if bytes.len() == 4));
        assert!(matches!(&events[1], LiveEvent::OutputTranscript(t) if t == "Hel"));
    }

    #[test]
    fn test_parse_input_transcript() {
        let raw = r#"{"serverContent":{"inputTranscription":{"text":"my car"}}}"#;
        let msg: ServerMessage = serde_json::from_str(raw).unwrap();
        let events = live_events(&msg);
        assert!(matches!(&events[..], [LiveEvent::InputTranscript(t)] if t == "my car"));
    }

    #[test]
    fn test_parse_interrupted() {
        let raw = r#"{"serverContent":{"interrupted":true}}"#;
        let msg: ServerMessage = serde_json::from_str(raw).unwrap();
        let events = live_events(&msg);
        assert!(matches!(events.as_slice(), [LiveEvent::Interrupted]));
    }

    #[test]
    fn test_turn_complete_is_parsed_but_silent() {
        let raw = r#"{"serverContent":{"turnComplete":true}}"#;
        let msg: ServerMessage = serde_json::from_str(raw).unwrap();
        assert_eq!(msg.server_content.as_ref().unwrap().turn_complete, Some(true));
        assert!(live_events(&msg).is_empty());
    }

    #[test]
    fn test_unknown_fields_ignored() {
        let raw = r#"{"serverContent":{"usageMetadata":{"tokens":5}},"extra":1}"#;
        let msg: ServerMessage = serde_json::from_str(raw).unwrap();
        assert!(live_events(&msg).is_empty());
    }
}
