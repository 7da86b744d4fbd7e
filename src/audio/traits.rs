/// Audio output the session drives. Decoding and buffering live behind it.
///
/// Calls are made while the session holds its state lock, so implementations
/// must not block and must report lifecycle changes through the
/// [`MediaEvent`](crate::event::events::MediaEvent) channel rather than by
/// calling back into the session.
pub trait MediaBackend: Send + Sync {
    fn set_source(&self, url: &str);
    fn play(&self);
    fn pause(&self);
    fn set_volume(&self, volume: f32);

    /// Called once when the session is torn down.
    fn release(&self) {}
}
