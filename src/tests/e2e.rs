//! End-to-end element scenarios

use tokio::sync::mpsc;

use crate::config::{ElementConfig, EncoderConfig};
use crate::error::PathError;
use crate::format::{Codec, InputFormat, OutputKind, RawAudioParams, SampleFormat};
use crate::gate::{drive_format_notifications, Resolution, TranscodeElement};
use crate::graph::{ComponentSpec, Endpoint};
use crate::plan::Rule;
use crate::tests::fixtures::{aac, s16le, GraphCall, RecordingGraph};

#[test]
fn test_static_format_assembles_on_construction() {
    let config = ElementConfig::new(OutputKind::Opus).with_input_format(aac(44100, 2));
    let element = TranscodeElement::new(config, RecordingGraph::new()).unwrap();

    assert!(element.is_resolved());
    let assembly = element.assembly().expect("assembled synchronously");
    assert_eq!(assembly.rule, Rule::AacToOpusResampled { channels: 2 });

    assert_eq!(
        element.graph().components(),
        vec![
            ComponentSpec::Decoder { codec: Codec::Aac },
            ComponentSpec::Resampler {
                sample_rate: 48000,
                sample_format: SampleFormat::S16LE,
                channels: 2,
            },
            ComponentSpec::Encoder {
                codec: Codec::Opus,
                bitrate: 64_000,
                channels: Some(2),
            },
        ]
    );
    assert_eq!(
        element.graph().links(),
        vec![
            (Endpoint::InputTap, Endpoint::Stage(0)),
            (Endpoint::Stage(0), Endpoint::Stage(1)),
            (Endpoint::Stage(1), Endpoint::Stage(2)),
            (Endpoint::Stage(2), Endpoint::OutputMerge),
        ]
    );
}

#[test]
fn test_waits_for_notification_without_static_format() {
    let element =
        TranscodeElement::new(ElementConfig::new(OutputKind::Opus), RecordingGraph::new()).unwrap();

    assert!(!element.is_resolved());
    assert!(element.input_format().is_none());
    assert!(element.assembly().is_none());
    assert!(element.graph().calls.is_empty());
}

#[test]
fn test_notification_assembles_once() {
    let mut element =
        TranscodeElement::new(ElementConfig::new(OutputKind::Opus), RecordingGraph::new()).unwrap();

    let first = element.on_format_observed(InputFormat::OpusInContainer).unwrap();
    assert_eq!(first, Resolution::Assembled);
    let calls_after_first = element.graph().calls.clone();

    let second = element.on_format_observed(aac(44100, 2)).unwrap();
    assert_eq!(second, Resolution::Ignored);
    let third = element.on_format_observed(InputFormat::OpusInContainer).unwrap();
    assert_eq!(third, Resolution::Ignored);

    assert_eq!(element.graph().calls, calls_after_first);
    assert_eq!(element.input_format(), Some(&InputFormat::OpusInContainer));
    assert_eq!(
        element.graph().components(),
        vec![ComponentSpec::Parser { codec: Codec::Opus }]
    );
}

#[test]
fn test_notification_after_static_format_is_ignored() {
    let config = ElementConfig::new(OutputKind::Aac).with_input_format(s16le(44100, 2));
    let mut element = TranscodeElement::new(config, RecordingGraph::new()).unwrap();
    let before = element.graph().calls.len();

    assert_eq!(
        element.on_format_observed(InputFormat::Opus).unwrap(),
        Resolution::Ignored
    );
    assert_eq!(element.graph().calls.len(), before);
    assert_eq!(element.input_format(), Some(&s16le(44100, 2)));
}

#[test]
fn test_passthrough_links_tap_to_merge() {
    let config = ElementConfig::new(OutputKind::Opus).with_input_format(InputFormat::Opus);
    let graph = TranscodeElement::new(config, RecordingGraph::new())
        .unwrap()
        .into_graph();

    assert_eq!(
        graph.calls,
        vec![GraphCall::Link {
            from: Endpoint::InputTap,
            to: Endpoint::OutputMerge,
        }]
    );
}

#[test]
fn test_unsupported_static_format_fails_without_touching_graph() {
    let mut graph = RecordingGraph::new();
    let output = OutputKind::raw_pinned(RawAudioParams {
        sample_rate: 48000,
        sample_format: SampleFormat::S16LE,
        channels: 2,
    });
    let config = ElementConfig::new(output).with_input_format(s16le(44100, 2));

    match TranscodeElement::new(config, &mut graph) {
        Err(PathError::UnsupportedConversion { input, output: o }) => {
            assert_eq!(input, s16le(44100, 2));
            assert_eq!(o, output);
        }
        Err(e) => panic!("unexpected error: {}", e),
        Ok(_) => panic!("raw resample must not be accepted"),
    }
    assert!(graph.calls.is_empty());
}

#[test]
fn test_unsupported_notification_is_fatal_and_final() {
    let output = OutputKind::raw_pinned(RawAudioParams {
        sample_rate: 44100,
        sample_format: SampleFormat::F32LE,
        channels: 2,
    });
    let mut element =
        TranscodeElement::new(ElementConfig::new(output), RecordingGraph::new()).unwrap();

    let err = element.on_format_observed(s16le(44100, 2)).unwrap_err();
    assert!(matches!(err, PathError::UnsupportedConversion { .. }));
    assert!(element.is_resolved());
    assert!(element.assembly().is_none());
    assert!(element.graph().calls.is_empty());

    // The gate never re-opens, even for a format that would have worked.
    assert_eq!(
        element
            .on_format_observed(InputFormat::RawAudio {
                sample_rate: 44100,
                sample_format: SampleFormat::F32LE,
                channels: 2,
            })
            .unwrap(),
        Resolution::Ignored
    );
    assert!(element.graph().calls.is_empty());
}

#[test]
fn test_host_graph_failure_propagates() {
    let mut graph = RecordingGraph {
        fail_at_slot: Some(1),
        ..Default::default()
    };
    let config = ElementConfig::new(OutputKind::Aac).with_input_format(InputFormat::Opus);

    let result = TranscodeElement::new(config, &mut graph);
    assert!(matches!(result, Err(PathError::Graph(_))));
}

#[test]
fn test_invalid_static_format_is_rejected() {
    let config = ElementConfig::new(OutputKind::Opus).with_input_format(aac(0, 2));
    let result = TranscodeElement::new(config, RecordingGraph::new());
    assert!(matches!(result, Err(PathError::InvalidFormat(_))));
}

#[test]
fn test_invalid_observed_format_is_rejected() {
    let mut element =
        TranscodeElement::new(ElementConfig::new(OutputKind::Opus), RecordingGraph::new())
            .unwrap();

    let result = element.on_format_observed(s16le(0, 0));
    assert!(matches!(result, Err(PathError::InvalidFormat(_))));
    assert!(!element.is_resolved());
    assert!(element.assembly().is_none());
    assert!(element.graph().calls.is_empty());

    let result = element.on_format_observed(aac(44100, 0));
    assert!(matches!(result, Err(PathError::InvalidFormat(_))));
    assert!(!element.is_resolved());

    // A later valid notification still resolves the gate
    assert_eq!(
        element.on_format_observed(s16le(44100, 2)).unwrap(),
        Resolution::Assembled
    );
    assert_eq!(element.input_format(), Some(&s16le(44100, 2)));
    assert!(element
        .graph()
        .components()
        .iter()
        .all(|c| !matches!(c, ComponentSpec::Resampler { channels: 0, .. })));
}

#[test]
fn test_encoder_config_reaches_encoder_component() {
    let config = ElementConfig::new(OutputKind::Opus)
        .with_input_format(s16le(22050, 1))
        .with_encoder(EncoderConfig {
            aac_bitrate: None,
            opus_bitrate: Some(16_000),
        });
    let element = TranscodeElement::new(config, RecordingGraph::new()).unwrap();

    assert_eq!(
        element.graph().components(),
        vec![
            ComponentSpec::Resampler {
                sample_rate: 48000,
                sample_format: SampleFormat::S16LE,
                channels: 1,
            },
            ComponentSpec::Encoder {
                codec: Codec::Opus,
                bitrate: 16_000,
                channels: Some(1),
            },
        ]
    );
}

#[test]
fn test_every_supported_pair_spawns_one_component_per_stage() {
    let inputs = [
        aac(44100, 2),
        aac(48000, 6),
        InputFormat::Opus,
        InputFormat::OpusInContainer,
        s16le(44100, 2),
        s16le(48000, 1),
    ];
    let outputs = [OutputKind::Aac, OutputKind::Opus, OutputKind::raw()];

    for input in inputs {
        for output in outputs {
            let chain = crate::plan::select_path(&input, &output).unwrap();
            let config = ElementConfig::new(output).with_input_format(input);
            let element = TranscodeElement::new(config, RecordingGraph::new()).unwrap();

            let graph = element.graph();
            assert_eq!(graph.components().len(), chain.len(), "{} -> {}", input, output);
            assert_eq!(graph.links().len(), chain.len() + 1, "{} -> {}", input, output);
            assert_eq!(graph.links().first().map(|l| l.0), Some(Endpoint::InputTap));
            assert_eq!(graph.links().last().map(|l| l.1), Some(Endpoint::OutputMerge));
        }
    }
}

#[tokio::test]
async fn test_channel_notifications_use_first_format() {
    let mut element =
        TranscodeElement::new(ElementConfig::new(OutputKind::raw()), RecordingGraph::new())
            .unwrap();

    let (tx, rx) = mpsc::channel(4);
    tx.send(aac(44100, 2)).await.unwrap();
    tx.send(InputFormat::Opus).await.unwrap();
    tx.send(aac(48000, 2)).await.unwrap();
    drop(tx);

    let ignored = drive_format_notifications(&mut element, rx).await.unwrap();
    assert_eq!(ignored, 2);
    assert_eq!(element.input_format(), Some(&aac(44100, 2)));
    assert_eq!(
        element.graph().components(),
        vec![ComponentSpec::Decoder { codec: Codec::Aac }]
    );
}

#[tokio::test]
async fn test_channel_notification_from_task() {
    let mut element =
        TranscodeElement::new(ElementConfig::new(OutputKind::Aac), RecordingGraph::new()).unwrap();

    let (tx, rx) = mpsc::channel(1);
    let sniffer = tokio::spawn(async move {
        tx.send(InputFormat::OpusInContainer).await.unwrap();
    });

    let ignored = drive_format_notifications(&mut element, rx).await.unwrap();
    sniffer.await.unwrap();

    assert_eq!(ignored, 0);
    assert_eq!(
        element.assembly().map(|a| a.rule),
        Some(Rule::OpusToAac)
    );
    assert_eq!(
        element.graph().components(),
        vec![
            ComponentSpec::Decoder { codec: Codec::Opus },
            ComponentSpec::Encoder {
                codec: Codec::Aac,
                bitrate: 128_000,
                channels: None,
            },
        ]
    );
}

#[tokio::test]
async fn test_channel_unsupported_conversion_stops_driver() {
    let output = OutputKind::raw_pinned(RawAudioParams {
        sample_rate: 48000,
        sample_format: SampleFormat::S16LE,
        channels: 2,
    });
    let mut element =
        TranscodeElement::new(ElementConfig::new(output), RecordingGraph::new()).unwrap();

    let (tx, rx) = mpsc::channel(2);
    tx.send(s16le(44100, 2)).await.unwrap();
    drop(tx);

    let result = drive_format_notifications(&mut element, rx).await;
    assert!(matches!(
        result,
        Err(PathError::UnsupportedConversion { .. })
    ));
    assert!(element.graph().calls.is_empty());
}

#[tokio::test]
async fn test_channel_invalid_format_stops_driver_unresolved() {
    let mut element =
        TranscodeElement::new(ElementConfig::new(OutputKind::Aac), RecordingGraph::new()).unwrap();

    let (tx, rx) = mpsc::channel(2);
    tx.send(s16le(0, 0)).await.unwrap();
    tx.send(s16le(44100, 2)).await.unwrap();
    drop(tx);

    let result = drive_format_notifications(&mut element, rx).await;
    assert!(matches!(result, Err(PathError::InvalidFormat(_))));
    assert!(!element.is_resolved());
    assert!(element.graph().calls.is_empty());
}
