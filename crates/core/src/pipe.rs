//! Pipe — the composition algebra.
//!
//! A [`Pipe`] is a typed transformation `I -> Output`. Any two pipes whose
//! types line up compose with [`Pipe::then`] into a [`Chain`], which is itself
//! a pipe and can be chained further. Retrieval, tool invocation, model calls
//! and post-processing are all just pipes.
//!
//! ```ignore
//! let mut pipeline = from_fn(|s: String| s.trim().to_string())
//!     .then(ContextAwareLanguageModel::new(model))
//!     .then(from_fn(|answer: String| answer.to_uppercase()));
//! let out = pipeline.execute("  hello ".into()).await;
//! ```
//!
//! Nothing is caught or retried here. A stage that can fail should make the
//! failure part of its output type; the chain hands it on unchanged.

use async_trait::async_trait;

/// A composable unit of computation.
///
/// `execute` takes `&mut self` so stages may accumulate state (a conversation
/// log, a retrieval history) without interior locking.
#[async_trait]
pub trait Pipe<I>: Send
where
    I: Send + 'static,
{
    type Output: Send + 'static;

    /// Run this stage on `input`.
    async fn execute(&mut self, input: I) -> Self::Output;

    /// Feed the output of this stage into `next`.
    fn then<P>(self, next: P) -> Chain<Self, P>
    where
        Self: Sized,
        P: Pipe<Self::Output>,
    {
        Chain {
            first: self,
            second: next,
        }
    }
}

/// Two stages run back to back.
#[derive(Debug, Clone)]
pub struct Chain<A, B> {
    first: A,
    second: B,
}

impl<A, B> Chain<A, B> {
    /// The upstream stage.
    pub fn first(&self) -> &A {
        &self.first
    }

    /// The downstream stage.
    pub fn second(&self) -> &B {
        &self.second
    }

    pub fn into_parts(self) -> (A, B) {
        (self.first, self.second)
    }
}

#[async_trait]
impl<I, A, B> Pipe<I> for Chain<A, B>
where
    I: Send + 'static,
    A: Pipe<I>,
    B: Pipe<A::Output>,
{
    type Output = B::Output;

    async fn execute(&mut self, input: I) -> Self::Output {
        let intermediate = self.first.execute(input).await;
        self.second.execute(intermediate).await
    }
}

/// A pipe backed by a synchronous closure.
#[derive(Debug, Clone)]
pub struct FnPipe<F> {
    f: F,
}

/// Wrap a closure as a pipe stage.
pub fn from_fn<F>(f: F) -> FnPipe<F> {
    FnPipe { f }
}

#[async_trait]
impl<I, O, F> Pipe<I> for FnPipe<F>
where
    I: Send + 'static,
    O: Send + 'static,
    F: FnMut(I) -> O + Send,
{
    type Output = O;

    async fn execute(&mut self, input: I) -> O {
        (self.f)(input)
    }
}

/// The identity stage; useful as the seed of an incrementally built chain.
#[derive(Debug, Clone, Copy, Default)]
pub struct Identity;

#[async_trait]
impl<I> Pipe<I> for Identity
where
    I: Send + 'static,
{
    type Output = I;

    async fn execute(&mut self, input: I) -> I {
        input
    }
}
