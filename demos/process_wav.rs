//! Runs a WAV file through the processor in fixed size blocks and writes the result
//! as a 32 bit float WAV file.
//!
//! ```text
//! RUST_LOG=debug cargo run --example process_wav -- input.wav output.wav [harmonic count]
//! ```

use std::error::Error;

use harmonic_divider::{Options, Processor};

const BLOCK_SIZE: usize = 1024;

fn read_channels(path: &str) -> Result<(Vec<Vec<f32>>, u32), Box<dyn Error>> {
    let mut reader = hound::WavReader::open(path)?;
    let spec = reader.spec();
    let channel_count = usize::from(spec.channels.max(1));

    let interleaved: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => reader.samples::<f32>().collect::<Result<Vec<f32>, _>>()?,
        hound::SampleFormat::Int => {
            let max = ((1_i64 << (spec.bits_per_sample - 1)) - 1) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| (v as f32) / max))
                .collect::<Result<Vec<f32>, _>>()?
        }
    };

    let mut channels = vec![Vec::with_capacity(interleaved.len() / channel_count); channel_count];
    for frame in interleaved.chunks(channel_count) {
        for (channel, sample) in channels.iter_mut().zip(frame.iter()) {
            channel.push(*sample);
        }
    }
    Ok((channels, spec.sample_rate))
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 3 {
        eprintln!("Usage: {} <input.wav> <output.wav> [harmonic count]", args[0]);
        std::process::exit(1);
    }
    let harmonic_count = match args.get(3) {
        Some(count) => count.parse()?,
        None => Options::default().harmonic_count,
    };

    let (mut channels, sample_rate) = read_channels(&args[1])?;
    let frame_count = channels.first().map(|c| c.len()).unwrap_or(0);
    log::info!(
        "Read {} channels of {} frames at {} Hz from {}",
        channels.len(),
        frame_count,
        sample_rate,
        args[1]
    );

    let mut processor = Processor::new();
    processor.configure(
        sample_rate as f32,
        BLOCK_SIZE,
        Options::default().with_harmonic_count(harmonic_count),
    )?;

    let mut offset = 0;
    while offset < frame_count {
        let block_len = BLOCK_SIZE.min(frame_count - offset);
        let mut block: Vec<&mut [f32]> = channels
            .iter_mut()
            .map(|channel| &mut channel[offset..offset + block_len])
            .collect();
        processor.process_block(&mut block, block_len)?;
        log::debug!(
            "Frame {}: {:.1} Hz / {:.1} Hz",
            offset,
            processor.fundamental(0),
            processor.fundamental(1)
        );
        offset += block_len;
    }

    let spec = hound::WavSpec {
        channels: channels.len() as u16,
        sample_rate,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };
    let mut writer = hound::WavWriter::create(&args[2], spec)?;
    for frame in 0..frame_count {
        for channel in channels.iter() {
            writer.write_sample(channel[frame])?;
        }
    }
    writer.finalize()?;
    log::info!("Wrote {}", args[2]);

    Ok(())
}
