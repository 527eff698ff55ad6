// End-to-end integration tests for the Narrator Backend API
//
// Every test gets its own application instance on an OS-assigned port, wired
// to its own in-process mock of the Azure Speech endpoint. Nothing is shared
// between tests, so they run in parallel.
//
// The mock answers with real MP3 audio, so synthesized responses go through
// the same decode / concatenate / encode path as production.

mod test_tts;
mod test_voices;
