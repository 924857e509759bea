//! Spawns [`Effect`]s as tokio tasks. Each task owns clones of what it
//! needs and reports exactly one [`Message`] back over the loop's channel.

use log::{debug, info, warn};
use std::sync::{Arc, mpsc};
use std::time::Duration;

use crate::core::refresh::{ContextResolver, run_refresh};
use crate::tui::message::{Effect, Message, ViewData};

/// Shared pieces every spawned task may need.
#[derive(Clone)]
pub struct TaskContext {
    pub resolver: Arc<dyn ContextResolver>,
    pub refresh_timeout: Duration,
    pub tx: mpsc::Sender<Message>,
}

pub fn spawn_all(effects: Vec<Effect>, ctx: &TaskContext) {
    for effect in effects {
        spawn(effect, ctx);
    }
}

pub fn spawn(effect: Effect, ctx: &TaskContext) {
    debug!("Spawning {:?}", effect);
    let tx = ctx.tx.clone();
    match effect {
        Effect::List {
            view,
            generation,
            source,
        } => {
            tokio::spawn(async move {
                let data = ViewData::Listed(source.list().await);
                send(&tx, Message::ViewData { view, generation, data });
            });
        }
        Effect::Page {
            view,
            generation,
            source,
            token,
        } => {
            tokio::spawn(async move {
                let page_size = source.page_limits().page_size;
                let data = ViewData::Paged(source.list_page(page_size, token).await);
                send(&tx, Message::ViewData { view, generation, data });
            });
        }
        Effect::Fetch {
            view,
            generation,
            source,
            id,
            target,
        } => {
            tokio::spawn(async move {
                let data = ViewData::Fetched(source.get(&id, target.as_ref()).await);
                send(&tx, Message::ViewData { view, generation, data });
            });
        }
        Effect::Delete {
            view,
            generation,
            source,
            id,
            target,
        } => {
            tokio::spawn(async move {
                let result = source.delete(&id, target.as_ref()).await;
                match &result {
                    Ok(()) => info!("Deleted {} from {}", id, source.label()),
                    Err(e) => warn!("Delete of {} from {} failed: {}", id, source.label(), e),
                }
                let data = ViewData::Deleted { id, target, result };
                send(&tx, Message::ViewData { view, generation, data });
            });
        }
        Effect::Refresh { request, selection } => {
            let resolver = ctx.resolver.clone();
            let timeout = ctx.refresh_timeout;
            tokio::spawn(async move {
                let response = run_refresh(&*resolver, request, selection, timeout).await;
                send(&tx, Message::Refreshed(response));
            });
        }
    }
}

fn send(tx: &mpsc::Sender<Message>, message: Message) {
    if tx.send(message).is_err() {
        warn!("Failed to deliver task result: receiver dropped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::{Branch, PageLimits, ResourceSource, StaticAdapter};
    use crate::core::refresh::{ConfiguredContext, RefreshKind, RefreshRequest};
    use crate::core::selection::Selection;
    use crate::resource::{CloudResource, Provenance};

    fn context() -> (TaskContext, mpsc::Receiver<Message>) {
        let (tx, rx) = mpsc::channel();
        let ctx = TaskContext {
            resolver: Arc::new(ConfiguredContext::default()),
            refresh_timeout: Duration::from_secs(1),
            tx,
        };
        (ctx, rx)
    }

    fn source() -> Arc<ResourceSource> {
        let adapter = StaticAdapter::new(vec![CloudResource::new("i-1", "web")]);
        Arc::new(ResourceSource::new(
            "ec2/instances",
            vec![Branch::new(Provenance::default(), Arc::new(adapter))],
            PageLimits::default(),
            1,
            Duration::from_secs(1),
        ))
    }

    async fn recv(rx: &mpsc::Receiver<Message>) -> Message {
        for _ in 0..100 {
            if let Ok(message) = rx.try_recv() {
                return message;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("no message received");
    }

    #[tokio::test]
    async fn test_list_effect_reports_to_its_view() {
        let (ctx, rx) = context();
        spawn(
            Effect::List {
                view: 3,
                generation: 2,
                source: source(),
            },
            &ctx,
        );

        match recv(&rx).await {
            Message::ViewData {
                view,
                generation,
                data: ViewData::Listed(Ok(listing)),
            } => {
                assert_eq!((view, generation), (3, 2));
                assert_eq!(listing.resources.len(), 1);
            }
            other => panic!("unexpected message: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_refresh_effect_carries_request_id() {
        let (ctx, rx) = context();
        let request = RefreshRequest {
            id: 9,
            kind: RefreshKind::Initial,
        };
        spawn(
            Effect::Refresh {
                request,
                selection: Selection::default(),
            },
            &ctx,
        );

        match recv(&rx).await {
            Message::Refreshed(response) => assert_eq!(response.request.id, 9),
            other => panic!("unexpected message: {other:?}"),
        }
    }
}
