use std::sync::Arc;

use comms::specs::fcnn::{ArchitectureDescriptor, ModelWeights};
use log::debug;
use model::{ModelErr, ModelProvider, Result, codec};
use tokio::{sync::Semaphore, task};

/// The `FCNN` service: turns an architecture into the weights of a freshly built network.
pub struct FcnnService<P: ModelProvider> {
    provider: P,
}

impl<P: ModelProvider> FcnnService<P> {
    /// Creates a new `FcnnService`.
    ///
    /// # Arguments
    /// * `provider` - Builds the networks.
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    /// Builds a network following `architecture` and returns its encoded weights.
    ///
    /// # Arguments
    /// * `architecture` - The amount of neurons per layer.
    ///
    /// # Returns
    /// One `LayerWeights` per layer transition, or an `InvalidArchitecture` error if
    /// there are less than two layers, an empty one or more weights than a response
    /// can carry, or a `Construction` error if the provider failed.
    pub fn create_model(&self, architecture: &ArchitectureDescriptor) -> Result<ModelWeights> {
        architecture.validate()?;

        let net = self
            .provider
            .construct(architecture.layers())
            .map_err(|e| match e {
                ModelErr::InvalidArchitecture(_) | ModelErr::Construction(_) => e,
                other => ModelErr::Construction(other.to_string()),
            })?;

        let model = codec::encode_model(net.weights().iter().map(|w| w.view()));
        if model.len() != architecture.transitions() {
            return Err(ModelErr::Construction(format!(
                "the provider built {} weight matrices for {} layer transitions",
                model.len(),
                architecture.transitions()
            )));
        }

        debug!(layers = model.len(), weights = model.size(); "encoded model");
        Ok(model)
    }
}

/// Runs `FcnnService` calls on a bounded pool of blocking workers.
///
/// Calls beyond `max_workers` wait until a worker frees up.
pub struct Dispatcher<P: ModelProvider> {
    service: Arc<FcnnService<P>>,
    permits: Arc<Semaphore>,
}

impl<P: ModelProvider> Clone for Dispatcher<P> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            permits: Arc::clone(&self.permits),
        }
    }
}

impl<P: ModelProvider + 'static> Dispatcher<P> {
    /// Creates a new `Dispatcher`.
    ///
    /// # Arguments
    /// * `service` - The service to dispatch calls to.
    /// * `max_workers` - The maximum amount of calls running at the same time, at least one.
    pub fn new(service: FcnnService<P>, max_workers: usize) -> Self {
        Self {
            service: Arc::new(service),
            permits: Arc::new(Semaphore::new(max_workers.max(1))),
        }
    }

    /// The amount of idle workers.
    pub fn available_workers(&self) -> usize {
        self.permits.available_permits()
    }

    /// Runs `FcnnService::create_model` on one of the workers.
    pub async fn create_model(&self, architecture: ArchitectureDescriptor) -> Result<ModelWeights> {
        let permit = Arc::clone(&self.permits)
            .acquire_owned()
            .await
            .map_err(|e| ModelErr::Construction(e.to_string()))?;

        let service = Arc::clone(&self.service);
        let call = task::spawn_blocking(move || {
            let _permit = permit;
            service.create_model(&architecture)
        });

        call.await
            .map_err(|e| ModelErr::Construction(format!("the worker failed: {e}")))?
    }
}
