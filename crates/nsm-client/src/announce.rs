//! Announce handshake.

use nsm_core::{Capabilities, Code, ServerInfo, Session, address};
use nsm_osc::Message;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::{
    AnnounceError, ClientConfig,
    correlator::{ReplyCorrelator, Routed},
    outbound::Outbound,
};

/// Number of arguments in a well-formed announce reply.
const REPLY_ARGS: usize = 4;

/// Build the announce request.
///
/// Arguments: name, capabilities, executable, major, minor, pid.
#[must_use]
pub fn announce_request(config: &ClientConfig) -> Message {
    Message::new(address::SERVER_ANNOUNCE)
        .arg(config.client_name())
        .arg(config.capabilities.to_string())
        .arg(config.executable())
        .arg(config.major)
        .arg(config.minor)
        // Process ids fit in i32 on every supported platform.
        .arg(i32::try_from(config.pid()).unwrap_or(i32::MAX))
}

/// Validate an announce reply and unpack the coordinator's info.
///
/// # Errors
/// Returns error naming the failed check: argument count, field type,
/// echoed address, or a refusal sent as `/error`.
pub fn parse_reply(msg: &Message) -> Result<ServerInfo, AnnounceError> {
    if msg.address == address::ERROR {
        return Err(AnnounceError::Refused {
            code: msg.int(1).unwrap_or(Code::General.as_i32()),
            message: msg.string(2).unwrap_or_default().to_string(),
        });
    }

    let got = msg.args.len();
    if got != REPLY_ARGS {
        return Err(AnnounceError::ArgCount {
            expected: REPLY_ARGS,
            got,
        });
    }
    let field = move |index: usize, field: &'static str| {
        msg.string(index)
            .map_err(|source| AnnounceError::Field { field, source })
    };

    let echoed = field(0, "reply address")?;
    if echoed != address::SERVER_ANNOUNCE {
        return Err(AnnounceError::AddressMismatch {
            expected: address::SERVER_ANNOUNCE.to_string(),
            got: echoed.to_string(),
        });
    }
    Ok(ServerInfo {
        message: field(1, "reply message")?.to_string(),
        name: field(2, "session manager name")?.to_string(),
        capabilities: Capabilities::parse(field(3, "session manager capabilities")?),
    })
}

/// Run the handshake.
///
/// Commands that arrive before the reply are pushed onto `backlog` for the
/// dispatcher. Returns `None` when not waiting for a reply.
///
/// # Errors
/// Returns error on send failure, timeout, cancellation, an invalid reply,
/// or a failing announce callback.
pub async fn handshake(
    outbound: &Outbound,
    config: &ClientConfig,
    session: &dyn Session,
    correlator: &mut ReplyCorrelator,
    backlog: &mut Vec<Message>,
    cancel: &CancellationToken,
) -> Result<Option<ServerInfo>, AnnounceError> {
    let request = announce_request(config);
    outbound
        .send(&request)
        .await
        .map_err(AnnounceError::Send)?;
    tracing::debug!(%request, "Sent announce");

    if !config.wait_for_announce_reply {
        return Ok(None);
    }

    correlator.expect(address::SERVER_ANNOUNCE);
    let deadline = Instant::now() + config.timeout;
    let reply = loop {
        let received = tokio::select! {
            () = cancel.cancelled() => return Err(AnnounceError::Cancelled),
            () = tokio::time::sleep_until(deadline) => {
                return Err(AnnounceError::Timeout(config.timeout));
            }
            received = outbound.transport().recv() => received,
        };

        match received {
            Ok(msg) => match correlator.route(msg) {
                Routed::Correlated(reply) => break reply,
                Routed::Command(msg) => {
                    tracing::debug!(address = %msg.address, "Deferring command until announce completes");
                    backlog.push(msg);
                }
                Routed::Dropped => {}
            },
            Err(e) if !e.is_fatal() => tracing::warn!("Skipping packet: {e}"),
            Err(e) => return Err(AnnounceError::Receive(e)),
        }
    };

    let info = parse_reply(&reply)?;
    tracing::info!(
        server = %info.name,
        capabilities = %info.capabilities,
        "Announce accepted: {}",
        info.message
    );
    session
        .announce(info.clone())
        .await
        .map_err(AnnounceError::Callback)?;
    Ok(Some(info))
}
