//! Block Breeze server (default binary).
//!
//! Headless entrypoint: owns the game session, applies commands arriving
//! over the TCP adapter, and publishes observations back to clients.

use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Result;

use block_breeze::adapter::server::build_observation;
use block_breeze::adapter::{
    create_ack, create_rejected_ack, Adapter, BestScoreStore, ClientCommand, InboundPayload,
    LastEventWire, OutboundMessage, StateHash,
};
use block_breeze::core::GameSession;

fn seed_from_env() -> u32 {
    if let Ok(raw) = std::env::var("BREEZE_SEED") {
        if let Ok(seed) = raw.parse::<u32>() {
            return seed;
        }
        eprintln!("[Server] ignoring unparsable BREEZE_SEED {:?}", raw);
    }
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos() ^ d.as_secs() as u32)
        .unwrap_or(0x5eed)
}

fn main() -> Result<()> {
    let seed = seed_from_env();

    let store = BestScoreStore::from_env();
    let stored_best = match store.load() {
        Ok(best) => best,
        Err(e) => {
            eprintln!("[Server] could not read best score: {:#}", e);
            0
        }
    };

    let mut session = GameSession::new(seed);
    session.set_best(stored_best);
    session.start();
    println!(
        "[Session] new game, seed {}, best so far {}",
        seed, stored_best
    );

    let Some(adapter) = Adapter::start_from_env() else {
        println!("[Server] adapter unavailable, nothing to serve");
        return Ok(());
    };

    run(adapter, session, store, stored_best)
}

fn run(
    mut adapter: Adapter,
    mut session: GameSession,
    store: BestScoreStore,
    mut best_on_disk: u32,
) -> Result<()> {
    let mut out_seq: u64 = 0;
    let mut last_broadcast: Option<StateHash> = None;

    while let Some(inbound) = adapter.recv_blocking() {
        match inbound.payload {
            InboundPayload::Command(ClientCommand::Place { slot, row, col }) => {
                match session.place(slot, row, col) {
                    Ok(report) => {
                        out_seq += 1;
                        let ack = create_ack(out_seq, inbound.seq);
                        adapter.send(OutboundMessage::ToClientAck {
                            client_id: inbound.client_id,
                            ack,
                        });

                        if report.board_exhausted {
                            println!("[Session] game over at {} points", report.new_score);
                        }
                        if report.new_best > best_on_disk {
                            match store.save(report.new_best) {
                                Ok(()) => {
                                    best_on_disk = report.new_best;
                                    println!("[Session] new best score {}", report.new_best);
                                }
                                Err(e) => {
                                    eprintln!("[Server] could not persist best score: {:#}", e);
                                }
                            }
                        }

                        let event = session.take_last_event().map(LastEventWire::from);
                        broadcast_if_changed(
                            &adapter,
                            &session,
                            &mut out_seq,
                            &mut last_broadcast,
                            event,
                        );
                    }
                    Err(e) => {
                        out_seq += 1;
                        let ack = create_rejected_ack(out_seq, inbound.seq, e.code(), e.message());
                        adapter.send(OutboundMessage::ToClientAck {
                            client_id: inbound.client_id,
                            ack,
                        });
                    }
                }
            }

            InboundPayload::Command(ClientCommand::Restart) => {
                session.restart();
                println!("[Session] restart, episode {}", session.episode_id());
                out_seq += 1;
                let ack = create_ack(out_seq, inbound.seq);
                adapter.send(OutboundMessage::ToClientAck {
                    client_id: inbound.client_id,
                    ack,
                });
                broadcast_if_changed(&adapter, &session, &mut out_seq, &mut last_broadcast, None);
            }

            InboundPayload::SnapshotRequest => {
                out_seq += 1;
                let obs = build_observation(&session, out_seq, None);
                adapter.send(OutboundMessage::ToClientObservation {
                    client_id: inbound.client_id,
                    obs,
                });
            }
        }
    }

    println!("[Server] command channel closed, shutting down");
    Ok(())
}

/// Broadcast the current state unless it hashes identically to the previous
/// broadcast.
fn broadcast_if_changed(
    adapter: &Adapter,
    session: &GameSession,
    out_seq: &mut u64,
    last_broadcast: &mut Option<StateHash>,
    event: Option<LastEventWire>,
) {
    *out_seq += 1;
    let obs = build_observation(session, *out_seq, event);
    if *last_broadcast == Some(obs.state_hash) {
        return;
    }
    *last_broadcast = Some(obs.state_hash);
    adapter.send(OutboundMessage::BroadcastObservation { obs });
}
