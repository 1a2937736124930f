use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};
use tracing::{debug, info, warn};

const SOUND_EXTENSIONS: [&str; 2] = ["wav", "mp3"];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SoundCue {
    Click,
    Match,
    Wrong,
    Win,
}

impl SoundCue {
    pub const ALL: [SoundCue; 4] = [
        SoundCue::Click,
        SoundCue::Match,
        SoundCue::Wrong,
        SoundCue::Win,
    ];

    pub fn file_stem(self) -> &'static str {
        match self {
            SoundCue::Click => "click",
            SoundCue::Match => "match",
            SoundCue::Wrong => "wrong",
            SoundCue::Win => "win",
        }
    }
}

/// `<stem>.wav` wins over `<stem>.mp3`.
pub fn find_sound(dir: &Path, cue: SoundCue) -> Option<PathBuf> {
    SOUND_EXTENSIONS
        .iter()
        .map(|ext| dir.join(format!("{}.{}", cue.file_stem(), ext)))
        .find(|path| path.is_file())
}

struct AudioOutput {
    _stream: OutputStream,
    handle: OutputStreamHandle,
}

/// Cosmetic sound effects. Every failure here ends in silence, never in an
/// error the player sees.
pub struct SoundBoard {
    output: Option<AudioOutput>,
    clips: HashMap<SoundCue, PathBuf>,
}

impl SoundBoard {
    pub fn disabled() -> Self {
        SoundBoard {
            output: None,
            clips: HashMap::new(),
        }
    }

    pub fn open(dir: &Path, enabled: bool) -> Self {
        if !enabled {
            info!("sound disabled by settings");
            return Self::disabled();
        }

        let clips: HashMap<SoundCue, PathBuf> = SoundCue::ALL
            .into_iter()
            .filter_map(|cue| find_sound(dir, cue).map(|path| (cue, path)))
            .collect();
        if clips.is_empty() {
            info!(dir = %dir.display(), "no sound files found, playing silently");
            return Self::disabled();
        }

        let output = match OutputStream::try_default() {
            Ok((stream, handle)) => Some(AudioOutput {
                _stream: stream,
                handle,
            }),
            Err(err) => {
                warn!(%err, "audio output unavailable, playing silently");
                None
            }
        };
        SoundBoard { output, clips }
    }

    pub fn is_enabled(&self) -> bool {
        self.output.is_some()
    }

    pub fn play(&self, cue: SoundCue) {
        let Some(output) = &self.output else {
            return;
        };
        let Some(path) = self.clips.get(&cue) else {
            return;
        };

        let file = match File::open(path) {
            Ok(file) => file,
            Err(err) => {
                debug!(path = %path.display(), %err, "sound file went missing");
                return;
            }
        };
        let source = match Decoder::new(BufReader::new(file)) {
            Ok(source) => source,
            Err(err) => {
                debug!(path = %path.display(), %err, "sound file could not be decoded");
                return;
            }
        };
        let Ok(sink) = Sink::try_new(&output.handle) else {
            return;
        };
        sink.append(source);
        sink.detach();
    }
}
