//! Text datagram protocol spoken by the turret controller.
//!
//! One ASCII command per packet, no framing. Commands addressed to the
//! actuator carry an `A` prefix; notification-channel events do not.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// A single command datagram.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    /// Deploy the wings.
    Open,
    /// Retract the wings.
    Close,
    /// Spin up the flywheels.
    RevOn,
    /// Spin down the flywheels.
    RevOff,
    /// Enable firing.
    FireOn,
    /// Disable firing.
    FireOff,
    VoicelineFound,
    VoicelineLost,
    VoicelineClose,
    /// Point at the given angles, in degrees.
    Aim { pitch: f32, yaw: f32 },
}

impl Command {
    /// Encoded wire bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.to_string().into_bytes()
    }

    pub fn is_aim(&self) -> bool {
        matches!(self, Command::Aim { .. })
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Open => f.write_str("Aopen"),
            Command::Close => f.write_str("Aclose"),
            Command::RevOn => f.write_str("ArevOn"),
            Command::RevOff => f.write_str("ArevOff"),
            Command::FireOn => f.write_str("AfireOn"),
            Command::FireOff => f.write_str("AfireOff"),
            Command::VoicelineFound => f.write_str("voiceline_found"),
            Command::VoicelineLost => f.write_str("voiceline_lost"),
            Command::VoicelineClose => f.write_str("voiceline_close"),
            Command::Aim { pitch, yaw } => write!(f, "AP{pitch:.2}Y{yaw:.2}"),
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ProtocolError {
    #[error("unknown command: {0:?}")]
    Unknown(String),
    #[error("malformed aim command: {0:?}")]
    MalformedAim(String),
}

impl FromStr for Command {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let cmd = match s {
            "Aopen" => Command::Open,
            "Aclose" => Command::Close,
            "ArevOn" => Command::RevOn,
            "ArevOff" => Command::RevOff,
            "AfireOn" => Command::FireOn,
            "AfireOff" => Command::FireOff,
            "voiceline_found" => Command::VoicelineFound,
            "voiceline_lost" => Command::VoicelineLost,
            "voiceline_close" => Command::VoicelineClose,
            _ => match s.strip_prefix("AP") {
                Some(body) => {
                    parse_aim(body).ok_or_else(|| ProtocolError::MalformedAim(s.into()))?
                }
                None => return Err(ProtocolError::Unknown(s.into())),
            },
        };
        Ok(cmd)
    }
}

/// Parse `<pitch>Y<yaw>`.
fn parse_aim(body: &str) -> Option<Command> {
    let (pitch, yaw) = body.split_once('Y')?;
    let pitch: f32 = pitch.parse().ok()?;
    let yaw: f32 = yaw.parse().ok()?;
    if !pitch.is_finite() || !yaw.is_finite() {
        return None;
    }
    Some(Command::Aim { pitch, yaw })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aim_encoding() {
        let cmd = Command::Aim {
            pitch: 10.0,
            yaw: 0.0,
        };
        assert_eq!(cmd.to_string(), "AP10.00Y0.00");

        let cmd = Command::Aim {
            pitch: -12.345,
            yaw: 29.999,
        };
        assert_eq!(cmd.to_string(), "AP-12.35Y30.00");
    }

    #[test]
    fn test_state_command_encoding() {
        assert_eq!(Command::Open.to_bytes(), b"Aopen");
        assert_eq!(Command::RevOff.to_string(), "ArevOff");
        assert_eq!(Command::VoicelineLost.to_string(), "voiceline_lost");
    }

    #[test]
    fn test_parse() {
        assert_eq!("AfireOn".parse::<Command>(), Ok(Command::FireOn));
        assert_eq!(
            "AP-40.50Y12.25".parse::<Command>(),
            Ok(Command::Aim {
                pitch: -40.5,
                yaw: 12.25
            })
        );
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(
            "fireOn".parse::<Command>(),
            Err(ProtocolError::Unknown("fireOn".into()))
        );
        assert!(matches!(
            "AP10.0".parse::<Command>(),
            Err(ProtocolError::MalformedAim(_))
        ));
        assert!(matches!(
            "APxY1".parse::<Command>(),
            Err(ProtocolError::MalformedAim(_))
        ));
    }
}
