//! BoxReplyGenerator -- object-safe dynamic dispatch wrapper for ReplyGenerator.
//!
//! 1. Define an object-safe `ReplyGeneratorDyn` trait with boxed futures
//! 2. Blanket-impl `ReplyGeneratorDyn` for all `T: ReplyGenerator`
//! 3. `BoxReplyGenerator` wraps `Box<dyn ReplyGeneratorDyn>` and delegates

use std::future::Future;
use std::pin::Pin;

use parley_types::reply::Message;

use super::generator::ReplyGenerator;

/// Object-safe version of [`ReplyGenerator`] with boxed futures.
///
/// This trait exists solely to enable dynamic dispatch (`dyn ReplyGeneratorDyn`).
/// A blanket implementation is provided for all types implementing `ReplyGenerator`.
pub trait ReplyGeneratorDyn: Send + Sync {
    fn name(&self) -> &str;

    fn generate_boxed<'a>(
        &'a self,
        conversation: &'a [Message],
    ) -> Pin<Box<dyn Future<Output = String> + Send + 'a>>;
}

/// Blanket implementation: any `ReplyGenerator` automatically implements `ReplyGeneratorDyn`.
impl<T: ReplyGenerator> ReplyGeneratorDyn for T {
    fn name(&self) -> &str {
        ReplyGenerator::name(self)
    }

    fn generate_boxed<'a>(
        &'a self,
        conversation: &'a [Message],
    ) -> Pin<Box<dyn Future<Output = String> + Send + 'a>> {
        Box::pin(self.generate(conversation))
    }
}

/// Type-erased reply generator for configuration-time variant selection.
///
/// Since `ReplyGenerator` uses RPITIT, it cannot be used as a trait object
/// directly. `BoxReplyGenerator` provides equivalent methods that delegate
/// to the inner `ReplyGeneratorDyn` trait object, so `ChatService` carries
/// one field regardless of which variant the deployment selected.
pub struct BoxReplyGenerator {
    inner: Box<dyn ReplyGeneratorDyn + Send + Sync>,
}

impl BoxReplyGenerator {
    /// Wrap a concrete `ReplyGenerator` in a type-erased box.
    pub fn new<T: ReplyGenerator + 'static>(generator: T) -> Self {
        Self {
            inner: Box::new(generator),
        }
    }

    /// Human-readable generator name.
    pub fn name(&self) -> &str {
        self.inner.name()
    }

    /// Produce the next assistant reply for the given conversation.
    pub async fn generate(&self, conversation: &[Message]) -> String {
        self.inner.generate_boxed(conversation).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EchoGenerator;

    impl ReplyGenerator for EchoGenerator {
        fn name(&self) -> &str {
            "echo"
        }

        async fn generate(&self, conversation: &[Message]) -> String {
            conversation
                .last()
                .map(|m| m.content.clone())
                .unwrap_or_default()
        }
    }

    #[tokio::test]
    async fn test_box_generator_delegates() {
        let boxed = BoxReplyGenerator::new(EchoGenerator);
        assert_eq!(boxed.name(), "echo");

        let conversation = vec![Message {
            role: parley_types::reply::MessageRole::User,
            content: "ping".to_string(),
        }];
        assert_eq!(boxed.generate(&conversation).await, "ping");
    }
}
