use crate::events::AppEvent;
use crate::script::{self, Step};
use async_channel::Sender;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

/// Reads steps line by line and posts them to the event loop. A `wait`
/// pauses reading so the page's own timers keep running meanwhile. End of
/// input posts [`AppEvent::Quit`].
pub async fn read_steps<R>(reader: R, tx: Sender<AppEvent>)
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    let mut line_no = 0;

    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                log::error!("Failed to read input: {}", e);
                break;
            }
        };
        line_no += 1;

        match script::parse_line(&line) {
            Ok(None) => {}
            Ok(Some(Step::Wait(d))) => tokio::time::sleep(d).await,
            Ok(Some(step)) => {
                if tx.send(AppEvent::Step(step)).await.is_err() {
                    return;
                }
            }
            Err(e) => log::error!("line {}: {}", line_no, e),
        }
    }

    let _ = tx.send(AppEvent::Quit).await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Key;

    #[tokio::test]
    async fn test_steps_are_forwarded_until_eof() {
        let (tx, rx) = async_channel::unbounded();
        let input: &[u8] = b"hover\nbogus step\nwait 1\n\nkey right # go\n";
        read_steps(input, tx).await;

        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        assert_eq!(
            events,
            vec![
                AppEvent::Step(Step::Hover),
                AppEvent::Step(Step::Key(Key::ArrowRight)),
                AppEvent::Quit,
            ]
        );
    }
}
