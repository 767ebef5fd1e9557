#![allow(dead_code)]

//! Scripted in-memory connection and factory for template tests.
//!
//! Replies are served from a shared script queue in issue order; the fake
//! records every command name plus acquire, release, and close counts so
//! tests can assert on connection lifecycle.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use bytes::Bytes;
use redikit_client::{Connection, ConnectionFactory, Error, Reply, Result, SortParams};

#[derive(Default)]
pub struct FakeState {
    replies: Mutex<VecDeque<Reply>>,
    commands: Mutex<Vec<String>>,
    pub acquired: AtomicUsize,
    pub released: AtomicUsize,
    pub closes: AtomicUsize,
    pub fail_acquire: AtomicBool,
}

impl FakeState {
    /// Queues canned replies, served one per issued command.
    pub fn script(&self, replies: impl IntoIterator<Item = Reply>) {
        self.replies.lock().unwrap().extend(replies);
    }

    pub fn commands(&self) -> Vec<String> {
        self.commands.lock().unwrap().clone()
    }

    pub fn acquired(&self) -> usize {
        self.acquired.load(Ordering::SeqCst)
    }

    pub fn released(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }

    pub fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }

    fn next_reply(&self) -> Reply {
        self.replies.lock().unwrap().pop_front().unwrap_or(Reply::Nil)
    }
}

pub fn fresh() -> (Arc<dyn ConnectionFactory>, Arc<FakeState>) {
    let state = Arc::new(FakeState::default());
    let factory: Arc<dyn ConnectionFactory> = Arc::new(FakeFactory { state: state.clone() });
    (factory, state)
}

pub fn bulk(payload: &'static [u8]) -> Reply {
    Reply::Bulk(Bytes::from_static(payload))
}

pub struct FakeFactory {
    state: Arc<FakeState>,
}

impl ConnectionFactory for FakeFactory {
    fn get_connection(&self) -> Result<Box<dyn Connection>> {
        if self.state.fail_acquire.load(Ordering::SeqCst) {
            return Err(Error::Acquire("factory offline".into()));
        }
        self.state.acquired.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(FakeConnection {
            state: self.state.clone(),
            pipelined: false,
            queueing: false,
            buffered: Vec::new(),
            queued: 0,
        }))
    }

    fn release(&self, _connection: Box<dyn Connection>) {
        self.state.released.fetch_add(1, Ordering::SeqCst);
    }
}

pub struct FakeConnection {
    state: Arc<FakeState>,
    pipelined: bool,
    queueing: bool,
    buffered: Vec<Reply>,
    queued: usize,
}

impl FakeConnection {
    fn issue(&mut self, command: &str) -> Result<Reply> {
        self.state.commands.lock().unwrap().push(command.to_owned());
        if self.queueing {
            self.queued += 1;
            return Ok(Reply::Queued);
        }
        let reply = self.state.next_reply();
        if self.pipelined {
            self.buffered.push(reply);
            Ok(Reply::Queued)
        } else {
            Ok(reply)
        }
    }
}

macro_rules! scripted_cmds {
    ($($name:ident ( $($arg:ident : $ty:ty),* )),+ $(,)?) => {
        $(
            fn $name(&mut self $(, $arg: $ty)*) -> Result<Reply> {
                $(let _ = $arg;)*
                self.issue(stringify!($name))
            }
        )+
    };
}

impl Connection for FakeConnection {
    scripted_cmds! {
        del(keys: &[Vec<u8>]),
        exists(key: &[u8]),
        expire(key: &[u8], seconds: u64),
        expire_at(key: &[u8], unix_seconds: i64),
        ttl(key: &[u8]),
        persist(key: &[u8]),
        keys(pattern: &[u8]),
        random_key(),
        rename(old_key: &[u8], new_key: &[u8]),
        rename_nx(old_key: &[u8], new_key: &[u8]),
        type_of(key: &[u8]),
        get(key: &[u8]),
        set(key: &[u8], value: &[u8]),
        get_set(key: &[u8], value: &[u8]),
        set_nx(key: &[u8], value: &[u8]),
        mget(keys: &[Vec<u8>]),
        incr_by(key: &[u8], delta: i64),
        append(key: &[u8], value: &[u8]),
        strlen(key: &[u8]),
        lpush(key: &[u8], value: &[u8]),
        rpush(key: &[u8], value: &[u8]),
        lpop(key: &[u8]),
        rpop(key: &[u8]),
        lrange(key: &[u8], start: i64, stop: i64),
        ltrim(key: &[u8], start: i64, stop: i64),
        llen(key: &[u8]),
        lindex(key: &[u8], index: i64),
        lset(key: &[u8], index: i64, value: &[u8]),
        lrem(key: &[u8], count: i64, value: &[u8]),
        sadd(key: &[u8], member: &[u8]),
        srem(key: &[u8], member: &[u8]),
        spop(key: &[u8]),
        smembers(key: &[u8]),
        sismember(key: &[u8], member: &[u8]),
        scard(key: &[u8]),
        smove(source: &[u8], destination: &[u8], member: &[u8]),
        zadd(key: &[u8], score: f64, member: &[u8]),
        zrem(key: &[u8], member: &[u8]),
        zincr_by(key: &[u8], delta: f64, member: &[u8]),
        zrank(key: &[u8], member: &[u8]),
        zrevrank(key: &[u8], member: &[u8]),
        zrange(key: &[u8], start: i64, stop: i64),
        zrange_by_score(key: &[u8], min: f64, max: f64),
        zscore(key: &[u8], member: &[u8]),
        zcard(key: &[u8]),
        hset(key: &[u8], field: &[u8], value: &[u8]),
        hset_nx(key: &[u8], field: &[u8], value: &[u8]),
        hget(key: &[u8], field: &[u8]),
        hmget(key: &[u8], fields: &[Vec<u8>]),
        hdel(key: &[u8], fields: &[Vec<u8>]),
        hexists(key: &[u8], field: &[u8]),
        hkeys(key: &[u8]),
        hvals(key: &[u8]),
        hgetall(key: &[u8]),
        hlen(key: &[u8]),
        hincr_by(key: &[u8], field: &[u8], delta: i64),
        publish(channel: &[u8], message: &[u8]),
    }

    fn sort(&mut self, _key: &[u8], _params: &SortParams) -> Result<Reply> {
        self.issue("sort")
    }

    fn sort_store(&mut self, _key: &[u8], _params: &SortParams, _destination: &[u8]) -> Result<Reply> {
        self.issue("sort_store")
    }

    fn multi(&mut self) -> Result<()> {
        self.state.commands.lock().unwrap().push("multi".into());
        self.queueing = true;
        self.queued = 0;
        Ok(())
    }

    fn exec(&mut self) -> Result<Vec<Reply>> {
        self.state.commands.lock().unwrap().push("exec".into());
        if !self.queueing {
            return Ok(Vec::new());
        }
        self.queueing = false;
        let replies = (0..self.queued).map(|_| self.state.next_reply()).collect();
        self.queued = 0;
        Ok(replies)
    }

    fn discard(&mut self) -> Result<()> {
        self.state.commands.lock().unwrap().push("discard".into());
        self.queueing = false;
        self.queued = 0;
        Ok(())
    }

    fn watch(&mut self, _keys: &[Vec<u8>]) -> Result<()> {
        self.state.commands.lock().unwrap().push("watch".into());
        Ok(())
    }

    fn unwatch(&mut self) -> Result<()> {
        self.state.commands.lock().unwrap().push("unwatch".into());
        Ok(())
    }

    fn is_queueing(&self) -> bool {
        self.queueing
    }

    fn is_pipelined(&self) -> bool {
        self.pipelined
    }

    fn open_pipeline(&mut self) -> Result<()> {
        self.pipelined = true;
        Ok(())
    }

    fn close_pipeline(&mut self) -> Result<Vec<Reply>> {
        self.pipelined = false;
        Ok(std::mem::take(&mut self.buffered))
    }

    fn close(&mut self) -> Result<()> {
        self.state.closes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
