// -------------------------------------------------------------------------------------------------
//  Copyright (C) 2015-2026 Nautech Systems Pty Ltd. All rights reserved.
//  https://nautechsystems.io
//
//  Licensed under the GNU Lesser General Public License Version 3.0 (the "License");
//  You may not use this file except in compliance with the License.
//  You may obtain a copy of the License at https://www.gnu.org/licenses/lgpl-3.0.en.html
//
//  Unless required by applicable law or agreed to in writing, software
//  distributed under the License is distributed on an "AS IS" BASIS,
//  WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//  See the License for the specific language governing permissions and
//  limitations under the License.
// -------------------------------------------------------------------------------------------------

//! Send side of the transport contract consumed by the engine.

use crate::error::WebApiResult;

/// An ordered, reliable, message-oriented outbound channel.
///
/// The receive side is not part of this trait: the owner of the connection feeds inbound frames
/// and lifecycle events into [`WorkflowEngine`](super::workflow::WorkflowEngine) itself.
pub trait Transport {
    /// Hands one binary frame to the connection.
    ///
    /// # Errors
    ///
    /// Returns [`WebApiError::ConnectionClosed`](crate::error::WebApiError::ConnectionClosed) if the
    /// transport has been closed, or a transport error if the frame could not be queued.
    fn send(&mut self, frame: Vec<u8>) -> WebApiResult<()>;

    /// Closes the connection. Further sends fail; closing twice is a no-op.
    fn close(&mut self);

    /// Returns whether [`Transport::close`] has been called or the peer went away.
    fn is_closed(&self) -> bool;
}
